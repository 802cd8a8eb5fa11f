//! Upgrade run configuration
//!
//! Defines the configuration for a texture upgrade pass over a folder.

use std::path::PathBuf;

/// Build target whose platform entry receives the overrides
pub const DEFAULT_TARGET_PLATFORM: &str = "Standalone";

/// Configuration for an upgrade run
#[derive(Debug, Clone)]
pub struct UpgradeConfig {
    /// Folder to scan for textures (recursively)
    pub folder: Option<PathBuf>,

    /// Build target to write overrides for
    pub platform: String,

    /// Report what would change without writing any `.meta` file
    pub dry_run: bool,

    /// Worker threads (None = rayon default)
    pub jobs: Option<usize>,

    /// Extra texture file extensions to pick up, lowercase, without dot
    pub extra_extensions: Vec<String>,

    /// Show a progress bar
    pub progress: bool,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            folder: None,
            platform: DEFAULT_TARGET_PLATFORM.to_string(),
            dry_run: false,
            jobs: None,
            extra_extensions: Vec::new(),
            progress: false,
        }
    }
}

impl UpgradeConfig {
    /// Validate the configuration and return the folder to scan
    pub fn validate(&self) -> Result<PathBuf, ConfigError> {
        let folder = self.folder.as_ref().ok_or(ConfigError::NoFolderSelected)?;

        if !folder.is_dir() {
            return Err(ConfigError::NotAFolder(folder.clone()));
        }

        if self.platform.trim().is_empty() {
            return Err(ConfigError::EmptyPlatform);
        }

        if self.jobs == Some(0) {
            return Err(ConfigError::ZeroJobs);
        }

        Ok(folder.clone())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Please select a folder first.")]
    NoFolderSelected,

    #[error("Selected path is not a valid folder: {0}")]
    NotAFolder(PathBuf),

    #[error("Platform name must not be empty")]
    EmptyPlatform,

    #[error("Job count must be at least 1")]
    ZeroJobs,
}
