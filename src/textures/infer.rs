//! Automatic format inference
//!
//! Approximates the format the editor picks for a desktop platform entry that
//! is not overridden. The compression policy only cares which legacy family
//! (DXT1 or DXT5) the result falls in.

use super::format::{AlphaSource, CompressionMode, TextureFormat, TextureRole};

/// Signals the editor uses to pick an automatic format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSignals {
    pub compression_mode: CompressionMode,
    pub crunched: bool,
    pub texture_role: TextureRole,
    pub alpha_source: AlphaSource,
    /// `alphaIsTransparency` flag from the importer
    pub alpha_is_transparency: bool,
    /// Whether the source image has an alpha channel; `None` if unreadable
    pub source_has_alpha: Option<bool>,
    pub source_is_hdr: bool,
}

impl FormatSignals {
    /// Whether the imported texture ends up with an alpha channel
    pub fn has_alpha(&self) -> bool {
        match self.alpha_source {
            AlphaSource::None => false,
            AlphaSource::FromGrayScale => true,
            AlphaSource::FromInput => self.source_has_alpha.unwrap_or(self.alpha_is_transparency),
        }
    }
}

/// Infer the automatic format for the given signals.
pub fn automatic_format(signals: &FormatSignals) -> TextureFormat {
    let alpha = signals.has_alpha();

    if signals.compression_mode == CompressionMode::Uncompressed {
        return match signals.texture_role {
            TextureRole::SingleChannel => TextureFormat::Alpha8,
            _ if alpha => TextureFormat::Rgba32,
            _ => TextureFormat::Rgb24,
        };
    }

    if signals.texture_role == TextureRole::SingleChannel {
        return TextureFormat::Bc4;
    }

    if signals.source_is_hdr {
        return TextureFormat::Bc6h;
    }

    match (signals.texture_role, signals.compression_mode) {
        (TextureRole::NormalMap, CompressionMode::CompressedHq) => TextureFormat::Bc5,
        (TextureRole::NormalMap, _) => legacy(true, signals.crunched),
        (_, CompressionMode::CompressedHq) => TextureFormat::Bc7,
        _ => legacy(alpha, signals.crunched),
    }
}

fn legacy(alpha: bool, crunched: bool) -> TextureFormat {
    match (alpha, crunched) {
        (false, false) => TextureFormat::Dxt1,
        (false, true) => TextureFormat::Dxt1Crunched,
        (true, false) => TextureFormat::Dxt5,
        (true, true) => TextureFormat::Dxt5Crunched,
    }
}
