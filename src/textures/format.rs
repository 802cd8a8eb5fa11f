//! Unity texture importer enumerations
//!
//! Each type maps to the integer code Unity serializes into `.meta` files.
//! Codes we don't model are kept in an `Other` variant so they survive a
//! read/write cycle untouched.

use serde::Serialize;
use std::fmt;

/// Compression format of a platform entry (`TextureImporterFormat`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextureFormat {
    /// Let the editor pick (`-1`)
    Automatic,
    Alpha8,
    Rgb24,
    Rgba32,
    /// DXT1 - opaque or 1-bit alpha, 4bpp
    Dxt1,
    /// DXT5 - interpolated alpha, 8bpp
    Dxt5,
    /// BC6H - HDR
    Bc6h,
    /// BC7 - high quality RGBA, 8bpp
    Bc7,
    /// BC4 - single channel
    Bc4,
    /// BC5 - two channel, ideal for normal maps
    Bc5,
    /// DXT1 with crunch entropy coding
    Dxt1Crunched,
    /// DXT5 with crunch entropy coding
    Dxt5Crunched,
    Other(i64),
}

impl TextureFormat {
    pub fn from_code(code: i64) -> Self {
        match code {
            -1 => TextureFormat::Automatic,
            1 => TextureFormat::Alpha8,
            3 => TextureFormat::Rgb24,
            4 => TextureFormat::Rgba32,
            10 => TextureFormat::Dxt1,
            12 => TextureFormat::Dxt5,
            24 => TextureFormat::Bc6h,
            25 => TextureFormat::Bc7,
            26 => TextureFormat::Bc4,
            27 => TextureFormat::Bc5,
            28 => TextureFormat::Dxt1Crunched,
            29 => TextureFormat::Dxt5Crunched,
            other => TextureFormat::Other(other),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            TextureFormat::Automatic => -1,
            TextureFormat::Alpha8 => 1,
            TextureFormat::Rgb24 => 3,
            TextureFormat::Rgba32 => 4,
            TextureFormat::Dxt1 => 10,
            TextureFormat::Dxt5 => 12,
            TextureFormat::Bc6h => 24,
            TextureFormat::Bc7 => 25,
            TextureFormat::Bc4 => 26,
            TextureFormat::Bc5 => 27,
            TextureFormat::Dxt1Crunched => 28,
            TextureFormat::Dxt5Crunched => 29,
            TextureFormat::Other(code) => code,
        }
    }

    /// DXT1 family (opaque legacy block formats)
    pub fn is_legacy_opaque(self) -> bool {
        matches!(self, TextureFormat::Dxt1 | TextureFormat::Dxt1Crunched)
    }

    /// DXT5 family (interpolated-alpha legacy block formats)
    pub fn is_legacy_alpha(self) -> bool {
        matches!(self, TextureFormat::Dxt5 | TextureFormat::Dxt5Crunched)
    }

    /// Get format name for logging
    pub fn name(&self) -> &'static str {
        match self {
            TextureFormat::Automatic => "Automatic",
            TextureFormat::Alpha8 => "Alpha8",
            TextureFormat::Rgb24 => "RGB24",
            TextureFormat::Rgba32 => "RGBA32",
            TextureFormat::Dxt1 => "DXT1",
            TextureFormat::Dxt5 => "DXT5",
            TextureFormat::Bc6h => "BC6H",
            TextureFormat::Bc7 => "BC7",
            TextureFormat::Bc4 => "BC4",
            TextureFormat::Bc5 => "BC5",
            TextureFormat::Dxt1Crunched => "DXT1 Crunched",
            TextureFormat::Dxt5Crunched => "DXT5 Crunched",
            TextureFormat::Other(_) => "Other",
        }
    }
}

impl fmt::Display for TextureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureFormat::Other(code) => write!(f, "format {}", code),
            _ => f.write_str(self.name()),
        }
    }
}

/// Platform `compressionQuality` (0-100 slider, three named stops)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompressionQuality {
    Fast,
    Normal,
    Best,
    Custom(i64),
}

impl CompressionQuality {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => CompressionQuality::Fast,
            50 => CompressionQuality::Normal,
            100 => CompressionQuality::Best,
            other => CompressionQuality::Custom(other),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            CompressionQuality::Fast => 0,
            CompressionQuality::Normal => 50,
            CompressionQuality::Best => 100,
            CompressionQuality::Custom(code) => code,
        }
    }
}

/// Mipmap generation filter (`mipMapMode`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MipmapFilter {
    Box,
    Kaiser,
    Other(i64),
}

impl MipmapFilter {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => MipmapFilter::Box,
            1 => MipmapFilter::Kaiser,
            other => MipmapFilter::Other(other),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            MipmapFilter::Box => 0,
            MipmapFilter::Kaiser => 1,
            MipmapFilter::Other(code) => code,
        }
    }
}

/// Semantic texture role (`textureType`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextureRole {
    Default,
    NormalMap,
    Gui,
    Cookie,
    Lightmap,
    Cursor,
    Sprite,
    SingleChannel,
    Other(i64),
}

impl TextureRole {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => TextureRole::Default,
            1 => TextureRole::NormalMap,
            2 => TextureRole::Gui,
            4 => TextureRole::Cookie,
            6 => TextureRole::Lightmap,
            7 => TextureRole::Cursor,
            8 => TextureRole::Sprite,
            10 => TextureRole::SingleChannel,
            other => TextureRole::Other(other),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            TextureRole::Default => 0,
            TextureRole::NormalMap => 1,
            TextureRole::Gui => 2,
            TextureRole::Cookie => 4,
            TextureRole::Lightmap => 6,
            TextureRole::Cursor => 7,
            TextureRole::Sprite => 8,
            TextureRole::SingleChannel => 10,
            TextureRole::Other(code) => code,
        }
    }
}

/// Coarse compression switch (`textureCompression`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompressionMode {
    Uncompressed,
    Compressed,
    CompressedHq,
    CompressedLq,
    Other(i64),
}

impl CompressionMode {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => CompressionMode::Uncompressed,
            1 => CompressionMode::Compressed,
            2 => CompressionMode::CompressedHq,
            3 => CompressionMode::CompressedLq,
            other => CompressionMode::Other(other),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            CompressionMode::Uncompressed => 0,
            CompressionMode::Compressed => 1,
            CompressionMode::CompressedHq => 2,
            CompressionMode::CompressedLq => 3,
            CompressionMode::Other(code) => code,
        }
    }
}

/// Where the importer takes the alpha channel from (`alphaUsage`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlphaSource {
    None,
    FromInput,
    FromGrayScale,
}

impl AlphaSource {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => AlphaSource::None,
            2 => AlphaSource::FromGrayScale,
            // Unity's default for unknown values
            _ => AlphaSource::FromInput,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_codes_round_trip() {
        assert_eq!(TextureFormat::from_code(47).code(), 47);
        assert_eq!(CompressionQuality::from_code(75).code(), 75);
        assert_eq!(TextureRole::from_code(11), TextureRole::Other(11));
    }

    #[test]
    fn test_unity_codes() {
        assert_eq!(TextureFormat::from_code(-1), TextureFormat::Automatic);
        assert_eq!(TextureFormat::from_code(25), TextureFormat::Bc7);
        assert_eq!(TextureFormat::Bc5.code(), 27);
        assert_eq!(CompressionQuality::Best.code(), 100);
        assert_eq!(MipmapFilter::from_code(1), MipmapFilter::Kaiser);
        assert_eq!(CompressionMode::from_code(0), CompressionMode::Uncompressed);
    }

    #[test]
    fn test_legacy_families() {
        assert!(TextureFormat::Dxt1.is_legacy_opaque());
        assert!(TextureFormat::Dxt1Crunched.is_legacy_opaque());
        assert!(!TextureFormat::Dxt5.is_legacy_opaque());
        assert!(TextureFormat::Dxt5Crunched.is_legacy_alpha());
        assert!(!TextureFormat::Bc7.is_legacy_alpha());
    }

    #[test]
    fn test_display() {
        assert_eq!(TextureFormat::Bc7.to_string(), "BC7");
        assert_eq!(TextureFormat::Other(99).to_string(), "format 99");
    }
}
