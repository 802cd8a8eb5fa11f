//! Folder upgrade pass
//!
//! Scans a folder for textures, runs the compression policy on each one's
//! importer settings and writes the changed `.meta` files back. The editor
//! re-imports the touched textures on its next asset refresh.

mod config;
mod scan;

pub use config::{ConfigError, UpgradeConfig, DEFAULT_TARGET_PLATFORM};
pub use scan::{find_textures, TEXTURE_EXTENSIONS};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::meta::{self, MetaError};
use crate::textures::{
    apply, automatic_format, read_source_info, FormatSignals, Rule, TextureImportConfig,
};

/// One texture whose settings the policy changed
#[derive(Debug, Clone, Serialize)]
pub struct TextureChange {
    pub path: PathBuf,
    pub rule: Option<Rule>,
    pub before: TextureImportConfig,
    pub after: TextureImportConfig,
}

/// Summary of an upgrade run
#[derive(Debug, Default, Serialize)]
pub struct UpgradeReport {
    pub scanned: usize,
    pub upgraded: usize,
    pub unchanged: usize,
    /// Assets without texture importer settings
    pub skipped: usize,
    pub failed: usize,
    pub dry_run: bool,
    pub changes: Vec<TextureChange>,
}

/// Outcome for a single asset
#[derive(Debug)]
pub enum AssetResult {
    Skipped,
    Unchanged,
    Upgraded(TextureChange),
}

/// Runs the compression policy over a folder
pub struct Upgrader {
    config: UpgradeConfig,
    folder: PathBuf,
}

impl Upgrader {
    pub fn new(config: UpgradeConfig) -> Result<Self, ConfigError> {
        let folder = config.validate()?;
        Ok(Self { config, folder })
    }

    pub fn run(&self) -> Result<UpgradeReport> {
        let assets = find_textures(&self.folder, &self.config.extra_extensions);
        info!("Found {} textures under {:?}", assets.len(), self.folder);

        let pb = if self.config.progress {
            let pb = ProgressBar::new(assets.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] Upgrading [{bar:40.cyan/blue}] {pos}/{len} | {msg}",
                    )?
                    .progress_chars("=>-"),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            ProgressBar::hidden()
        };

        let upgraded_count = AtomicUsize::new(0);
        let platform = self.config.platform.as_str();
        let dry_run = self.config.dry_run;

        let process_all = || -> Vec<(PathBuf, Result<AssetResult>)> {
            assets
                .par_iter()
                .map(|asset| {
                    let result = process_asset(asset, platform, dry_run);
                    if matches!(result, Ok(AssetResult::Upgraded(_))) {
                        let n = upgraded_count.fetch_add(1, Ordering::Relaxed) + 1;
                        pb.set_message(format!("{} upgraded", n));
                    }
                    pb.inc(1);
                    (asset.clone(), result)
                })
                .collect()
        };

        let results = match self.config.jobs {
            Some(jobs) => rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build()
                .context("Failed to build worker pool")?
                .install(process_all),
            None => process_all(),
        };
        pb.finish_and_clear();

        let mut report = UpgradeReport {
            scanned: assets.len(),
            dry_run,
            ..Default::default()
        };
        for (path, result) in results {
            match result {
                Ok(AssetResult::Skipped) => report.skipped += 1,
                Ok(AssetResult::Unchanged) => report.unchanged += 1,
                Ok(AssetResult::Upgraded(change)) => {
                    report.upgraded += 1;
                    report.changes.push(change);
                }
                Err(e) => {
                    warn!("Failed to upgrade {:?}: {:#}", path, e);
                    report.failed += 1;
                }
            }
        }

        info!("{} Textures upgraded", report.upgraded);
        Ok(report)
    }
}

/// Build the policy input for `asset` from its `.meta` and source header
pub fn import_config(
    asset: &Path,
    meta: &meta::TextureImporterMeta,
) -> Result<TextureImportConfig> {
    let settings = meta
        .read()
        .with_context(|| format!("Invalid importer settings in {:?}", meta::meta_path(asset)))?;

    let (width, height, has_alpha, is_hdr) = match read_source_info(asset) {
        Ok(info) => (info.width, info.height, Some(info.has_alpha), info.is_hdr),
        Err(e) => {
            // Unknown dimensions never count as small; max size still decides
            warn!("Could not read source header of {:?}: {:#}", asset, e);
            let hdr = asset
                .extension()
                .map(|ext| {
                    let ext = ext.to_string_lossy().to_lowercase();
                    ext == "exr" || ext == "hdr"
                })
                .unwrap_or(false);
            (u32::MAX, u32::MAX, None, hdr)
        }
    };

    let mut config = settings.config;
    config.source_width = width;
    config.source_height = height;
    config.inferred_default_format = automatic_format(&FormatSignals {
        compression_mode: config.compression_mode,
        crunched: config.crunched,
        texture_role: config.texture_role,
        alpha_source: settings.alpha_source,
        alpha_is_transparency: settings.alpha_is_transparency,
        source_has_alpha: has_alpha,
        source_is_hdr: is_hdr,
    });

    Ok(config)
}

/// Run the policy on one asset, writing its `.meta` unless `dry_run`
pub fn process_asset(asset: &Path, platform: &str, dry_run: bool) -> Result<AssetResult> {
    let mut meta = match meta::load(asset, platform) {
        Ok(meta) => meta,
        Err(e) if matches!(e.downcast_ref::<MetaError>(), Some(MetaError::NotATextureImporter)) => {
            debug!("Skipping {:?}: {}", asset, e);
            return Ok(AssetResult::Skipped);
        }
        Err(e) => return Err(e),
    };

    let before = import_config(asset, &meta)?;
    let outcome = apply(&before);

    if !outcome.changed {
        debug!("{:?} already up to date", asset);
        return Ok(AssetResult::Unchanged);
    }

    if !dry_run {
        let dirty = meta
            .write(&before, &outcome.config, outcome.persist_override)
            .with_context(|| format!("Failed to update settings of {:?}", asset))?;
        if dirty {
            meta::save(asset, &meta)?;
        }
    }

    info!(
        "Upgraded {:?} ({:?}, {} -> {})",
        asset,
        outcome.rule,
        before.platform_override.format,
        outcome.config.platform_override.format
    );

    Ok(AssetResult::Upgraded(TextureChange {
        path: asset.to_path_buf(),
        rule: outcome.rule,
        before,
        after: outcome.config,
    }))
}
