//! Unity `.meta` sidecar files
//!
//! Reading and writing of the `TextureImporter` settings stored next to each
//! texture asset.

mod document;
mod importer;

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

pub use document::{Block, MetaDocument};
pub use importer::{ImporterSettings, TextureImporterMeta, DEFAULT_PLATFORM};

/// Errors from interpreting a `.meta` file
#[derive(Debug, thiserror::Error)]
pub enum MetaError {
    #[error("no TextureImporter block (not an importable texture)")]
    NotATextureImporter,

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("no platformSettings entries to hold the {0} override")]
    MissingPlatformSettings(String),
}

/// `Textures/rock.png` -> `Textures/rock.png.meta`
pub fn meta_path(asset: &Path) -> PathBuf {
    let mut name = asset.as_os_str().to_os_string();
    name.push(".meta");
    PathBuf::from(name)
}

/// Load the texture importer settings stored beside `asset`.
///
/// A `.meta` for some other importer fails with
/// [`MetaError::NotATextureImporter`], reachable via `downcast_ref`.
pub fn load(asset: &Path, platform: &str) -> Result<TextureImporterMeta> {
    let path = meta_path(asset);
    let text =
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
    Ok(TextureImporterMeta::parse(&text, platform)?)
}

/// Write `meta` beside `asset`, replacing the old file atomically
pub fn save(asset: &Path, meta: &TextureImporterMeta) -> Result<()> {
    let path = meta_path(asset);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {:?}", dir))?;
    tmp.write_all(meta.document().to_string().as_bytes())
        .with_context(|| format!("Failed to write {:?}", tmp.path()))?;
    tmp.persist(&path)
        .with_context(|| format!("Failed to replace {:?}", path))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMPORTER: &str = "fileFormatVersion: 2
guid: 1
TextureImporter:
  mipmaps:
    mipMapMode: 0
  textureType: 0
";

    #[test]
    fn test_meta_path() {
        assert_eq!(
            meta_path(Path::new("Assets/Textures/rock.png")),
            PathBuf::from("Assets/Textures/rock.png.meta")
        );
    }

    #[test]
    fn test_load_and_save() {
        let temp = tempfile::tempdir().unwrap();
        let asset = temp.path().join("rock.png");
        std::fs::write(meta_path(&asset), IMPORTER).unwrap();

        let meta = load(&asset, "Standalone").unwrap();
        assert_eq!(meta.platform(), "Standalone");
        save(&asset, &meta).unwrap();
        assert_eq!(std::fs::read_to_string(meta_path(&asset)).unwrap(), IMPORTER);
    }

    #[test]
    fn test_load_other_importer() {
        let temp = tempfile::tempdir().unwrap();
        let asset = temp.path().join("notes.txt");
        let text = "fileFormatVersion: 2\nTextScriptImporter:\n  userData:\n";
        std::fs::write(meta_path(&asset), text).unwrap();

        let err = load(&asset, "Standalone").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MetaError>(),
            Some(MetaError::NotATextureImporter)
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let err = load(&temp.path().join("gone.png"), "Standalone").unwrap_err();
        assert!(err.downcast_ref::<MetaError>().is_none());
    }
}
