//! texture-upgrader - better texture compression without more VRAM

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use texture_upgrader::meta;
use texture_upgrader::settings::{Settings, SettingsUpdate};
use texture_upgrader::textures::apply;
use texture_upgrader::upgrader::{import_config, UpgradeConfig, Upgrader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "texture-upgrader")]
#[command(version)]
#[command(about = "Upgrade Unity texture compression settings without increasing VRAM usage")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (use RUST_LOG=debug for more detail)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Upgrade every texture under a folder
    Upgrade {
        /// Folder to scan (e.g. Assets/Textures)
        folder: Option<PathBuf>,

        /// Build target to write overrides for (defaults to settings, then Standalone)
        #[arg(short, long, env = "TEXTURE_UPGRADER_PLATFORM")]
        platform: Option<String>,

        /// Report changes without writing .meta files
        #[arg(long)]
        dry_run: bool,

        /// Worker threads (defaults to CPU thread count)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Show the importer settings of one texture and what the upgrade would do
    Inspect {
        /// Texture asset or its .meta file
        path: PathBuf,

        /// Build target to inspect
        #[arg(short, long, env = "TEXTURE_UPGRADER_PLATFORM")]
        platform: Option<String>,
    },

    /// Show or change the saved defaults
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show the settings file location and contents
    Show,

    /// Change saved defaults
    Set {
        /// Default build target for overrides
        #[arg(short, long)]
        platform: Option<String>,

        /// Default worker thread count (0 = one per core)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Extra texture extensions to scan, comma separated (empty to clear)
        #[arg(long, value_delimiter = ',')]
        extensions: Option<Vec<String>>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Only initialize logging if verbose or RUST_LOG is set
    if cli.verbose || std::env::var("RUST_LOG").is_ok() {
        let filter = EnvFilter::from_default_env().add_directive(if cli.verbose {
            "texture_upgrader=debug".parse()?
        } else {
            "texture_upgrader=warn".parse()?
        });
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr);
        if cli.log_json {
            builder.json().init();
        } else {
            builder.init();
        }
    }

    let mut settings = Settings::load();

    match cli.command {
        Commands::Upgrade {
            folder,
            platform,
            dry_run,
            jobs,
            json,
            no_progress,
        } => {
            let config = UpgradeConfig {
                folder,
                platform: platform.unwrap_or_else(|| settings.default_platform.clone()),
                dry_run,
                jobs: jobs.or(settings.jobs),
                extra_extensions: settings.extra_extensions.clone(),
                progress: !no_progress && !json,
            };

            let upgrader = Upgrader::new(config)?;
            let report = upgrader.run()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            for change in &report.changes {
                let rule = change
                    .rule
                    .map(|r| format!("{:?}", r))
                    .unwrap_or_else(|| "baseline".to_string());
                println!("  {} [{}]", change.path.display(), rule);
            }
            if report.skipped > 0 {
                println!("Skipped {} non-texture assets", report.skipped);
            }
            if report.failed > 0 {
                println!(
                    "Failed to process {} textures (run with --verbose for details)",
                    report.failed
                );
            }
            if report.dry_run {
                println!("{} Textures would be upgraded (dry run)", report.upgraded);
            } else {
                println!("{} Textures upgraded", report.upgraded);
            }
        }

        Commands::Inspect { path, platform } => {
            let platform = platform.unwrap_or_else(|| settings.default_platform.clone());
            let asset = asset_path(&path);

            let meta = meta::load(&asset, &platform)?;
            let config = import_config(&asset, &meta)?;
            let outcome = apply(&config);

            println!("Texture: {}", asset.display());
            println!("Platform: {}", platform);
            println!("Current:\n{}", serde_json::to_string_pretty(&config)?);
            if outcome.changed {
                println!("Rule: {:?}", outcome.rule);
                println!("Upgraded:\n{}", serde_json::to_string_pretty(&outcome.config)?);
            } else {
                println!("Already up to date");
            }
        }

        Commands::Settings { action } => {
            let path = Settings::settings_path().context("Could not locate settings file")?;

            if let Some(SettingsAction::Set {
                platform,
                jobs,
                extensions,
            }) = action
            {
                let update = SettingsUpdate {
                    default_platform: platform,
                    jobs: jobs.map(|n| if n == 0 { None } else { Some(n) }),
                    extra_extensions: extensions,
                };
                if settings.update(update) {
                    settings.save()?;
                    println!("Saved settings");
                } else {
                    println!("Settings unchanged");
                }
            }

            println!("Settings file: {}", path.display());
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}

/// Accept either `rock.png` or `rock.png.meta`
fn asset_path(path: &Path) -> PathBuf {
    match path.to_str().and_then(|s| s.strip_suffix(".meta")) {
        Some(asset) => PathBuf::from(asset),
        None => path.to_path_buf(),
    }
}
