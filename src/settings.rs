//! Persistent user defaults
//!
//! Stores preferences in ~/.config/texture-upgrader/settings.json

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use crate::upgrader::DEFAULT_TARGET_PLATFORM;

fn default_platform() -> String {
    DEFAULT_TARGET_PLATFORM.to_string()
}

/// User settings for texture-upgrader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Build target to write overrides for
    #[serde(default = "default_platform")]
    pub default_platform: String,

    /// Additional texture extensions to scan (e.g. "webp")
    #[serde(default)]
    pub extra_extensions: Vec<String>,

    /// Worker threads (None = one per core)
    #[serde(default)]
    pub jobs: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_platform: default_platform(),
            extra_extensions: Vec::new(),
            jobs: None,
        }
    }
}

/// Fields to change in [`Settings::update`]; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub default_platform: Option<String>,
    /// `Some(None)` resets to one thread per core
    pub jobs: Option<Option<usize>>,
    pub extra_extensions: Option<Vec<String>>,
}

impl Settings {
    /// Apply `update`, returning whether anything changed
    pub fn update(&mut self, update: SettingsUpdate) -> bool {
        let before = self.clone();

        if let Some(platform) = update.default_platform {
            let platform = platform.trim();
            if !platform.is_empty() {
                self.default_platform = platform.to_string();
            }
        }
        if let Some(jobs) = update.jobs {
            self.jobs = jobs;
        }
        if let Some(extensions) = update.extra_extensions {
            // "webp", ".WEBP" and " webp " all mean the same extension
            let mut normalized: Vec<String> = extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect();
            normalized.sort();
            normalized.dedup();
            self.extra_extensions = normalized;
        }

        *self != before
    }

    /// Get the config directory path (~/.config/texture-upgrader)
    fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("texture-upgrader");

        Ok(config_dir)
    }

    /// Get the settings file path
    pub fn settings_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("settings.json"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        match Self::settings_path().and_then(|path| Self::load_from(&path)) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Could not load settings: {:#}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Load settings from `path`; a missing file yields defaults
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

        let settings: Self =
            serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))?;

        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;

        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.default_platform, "Standalone");
        assert!(settings.extra_extensions.is_empty());
        assert!(settings.jobs.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"jobs": 4}"#).unwrap();
        assert_eq!(settings.jobs, Some(4));
        assert_eq!(settings.default_platform, "Standalone");
    }

    #[test]
    fn test_save_and_load() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nested/settings.json");

        let settings = Settings {
            default_platform: "Android".into(),
            extra_extensions: vec!["webp".into()],
            jobs: Some(2),
        };
        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_update() {
        let mut settings = Settings::default();
        let changed = settings.update(SettingsUpdate {
            default_platform: Some("Android".into()),
            jobs: Some(Some(3)),
            extra_extensions: Some(vec![".WEBP".into(), "webp".into(), " ".into(), "ktx".into()]),
        });
        assert!(changed);
        assert_eq!(settings.default_platform, "Android");
        assert_eq!(settings.jobs, Some(3));
        assert_eq!(settings.extra_extensions, vec!["ktx".to_string(), "webp".to_string()]);

        assert!(!settings.update(SettingsUpdate::default()));
        assert!(!settings.update(SettingsUpdate {
            default_platform: Some("  ".into()),
            ..Default::default()
        }));

        assert!(settings.update(SettingsUpdate {
            jobs: Some(None),
            extra_extensions: Some(Vec::new()),
            ..Default::default()
        }));
        assert!(settings.jobs.is_none());
        assert!(settings.extra_extensions.is_empty());
    }

    #[test]
    fn test_missing_file_is_default() {
        let temp = tempfile::tempdir().unwrap();
        let loaded = Settings::load_from(&temp.path().join("none.json")).unwrap();
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn test_corrupt_file_errors() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(Settings::load_from(&path).is_err());
    }
}
