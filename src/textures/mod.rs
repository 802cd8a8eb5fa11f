//! Texture import policy
//!
//! Importer value types, the compression policy, automatic-format inference
//! and source image reading.

mod format;
mod infer;
mod policy;
mod source;

pub use format::{
    AlphaSource, CompressionMode, CompressionQuality, MipmapFilter, TextureFormat, TextureRole,
};
pub use infer::{automatic_format, FormatSignals};
pub use policy::{
    apply, PlatformOverride, PolicyOutcome, Rule, TextureImportConfig, SMALL_TEXTURE_EDGE,
    TINY_TEXTURE_EDGE,
};
pub use source::{read_source_info, SourceInfo};
