//! Texture asset discovery

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::meta::meta_path;

/// File extensions the editor imports as textures
pub const TEXTURE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "tga", "psd", "tif", "tiff", "bmp", "gif", "exr", "hdr", "iff", "pict",
];

fn is_texture(path: &Path, extra: &[String]) -> bool {
    let Some(ext) = path.extension() else {
        return false;
    };
    let ext = ext.to_string_lossy().to_lowercase();
    TEXTURE_EXTENSIONS.contains(&ext.as_str()) || extra.iter().any(|e| e.eq_ignore_ascii_case(&ext))
}

/// Find every texture under `folder` that has a `.meta` sidecar.
///
/// Returns a sorted list of asset paths.
pub fn find_textures(folder: &Path, extra_extensions: &[String]) -> Vec<PathBuf> {
    let mut textures: Vec<PathBuf> = WalkDir::new(folder)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_texture(p, extra_extensions))
        .filter(|p| meta_path(p).is_file())
        .collect();

    textures.sort();
    textures
}
