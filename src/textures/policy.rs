//! Compression policy
//!
//! Picks better block formats for a texture without raising its VRAM cost:
//! - crunch off, Kaiser mip filter
//! - tiny textures (<= 128px) uncompressed, platform override dropped
//! - normal maps on BC5
//! - small DXT1 textures and all DXT5 textures on BC7 / Best
//!
//! The policy is a pure function of one [`TextureImportConfig`].

use serde::Serialize;

use super::format::{CompressionMode, CompressionQuality, MipmapFilter, TextureFormat, TextureRole};

/// Textures at or below this edge length are left uncompressed
pub const TINY_TEXTURE_EDGE: u32 = 128;

/// DXT1 textures at or below this edge length are upgraded to BC7
pub const SMALL_TEXTURE_EDGE: u32 = 512;

/// Platform-specific compression settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformOverride {
    /// Whether the platform entry exists in the importer settings
    pub present: bool,
    pub format: TextureFormat,
    pub quality: CompressionQuality,
    /// `false` means the platform falls back to the automatic format
    pub overridden: bool,
    pub max_size: u32,
}

impl Default for PlatformOverride {
    fn default() -> Self {
        Self {
            present: false,
            format: TextureFormat::Automatic,
            quality: CompressionQuality::Normal,
            overridden: false,
            max_size: 2048,
        }
    }
}

/// The importer settings the policy reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextureImportConfig {
    pub crunched: bool,
    pub mipmap_filter: MipmapFilter,
    /// Declared max edge length
    pub max_size: u32,
    pub source_width: u32,
    pub source_height: u32,
    pub texture_role: TextureRole,
    pub compression_mode: CompressionMode,
    pub platform_override: PlatformOverride,
    /// Format the platform would use without an override
    pub inferred_default_format: TextureFormat,
}

impl TextureImportConfig {
    fn fits_within(&self, edge: u32) -> bool {
        self.max_size <= edge || (self.source_width <= edge && self.source_height <= edge)
    }

    pub fn is_tiny(&self) -> bool {
        self.fits_within(TINY_TEXTURE_EDGE)
    }

    pub fn is_small(&self) -> bool {
        self.fits_within(SMALL_TEXTURE_EDGE)
    }

    fn needs_best_bc7(&self) -> bool {
        let o = &self.platform_override;
        o.format != TextureFormat::Bc7 || o.quality != CompressionQuality::Best || !o.overridden
    }
}

/// Which size/role rule fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rule {
    TinyUncompressed,
    NormalMapBc5,
    SmallOpaqueBc7,
    TransparentBc7,
}

/// Result of [`apply`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PolicyOutcome {
    pub config: TextureImportConfig,
    pub changed: bool,
    /// The platform block must be written back as a unit
    pub persist_override: bool,
    pub rule: Option<Rule>,
}

/// Run the compression policy over one texture's settings.
pub fn apply(input: &TextureImportConfig) -> PolicyOutcome {
    let mut config = *input;
    let mut changed = false;
    let mut persist_override = false;
    let mut write_override = false;

    if config.crunched {
        config.crunched = false;
        changed = true;
    }

    if config.mipmap_filter != MipmapFilter::Kaiser {
        config.mipmap_filter = MipmapFilter::Kaiser;
        changed = true;
    }

    let rule = if config.is_tiny() {
        if config.compression_mode != CompressionMode::Uncompressed {
            config.compression_mode = CompressionMode::Uncompressed;
            changed = true;
        }
        if config.platform_override.overridden {
            config.platform_override.overridden = false;
            config.platform_override.max_size = config.max_size;
            persist_override = true;
            changed = true;
        }
        Some(Rule::TinyUncompressed)
    } else if config.texture_role == TextureRole::NormalMap {
        let o = &mut config.platform_override;
        if o.format != TextureFormat::Bc5 || !o.overridden {
            o.format = TextureFormat::Bc5;
            write_override = true;
            changed = true;
        }
        Some(Rule::NormalMapBc5)
    } else if config.is_small()
        && config.inferred_default_format.is_legacy_opaque()
        && config.needs_best_bc7()
    {
        upgrade_to_best_bc7(&mut config.platform_override);
        write_override = true;
        changed = true;
        Some(Rule::SmallOpaqueBc7)
    } else if config.inferred_default_format.is_legacy_alpha() && config.needs_best_bc7() {
        upgrade_to_best_bc7(&mut config.platform_override);
        write_override = true;
        changed = true;
        Some(Rule::TransparentBc7)
    } else {
        None
    };

    if write_override {
        let max_size = config.max_size;
        let o = &mut config.platform_override;
        o.overridden = true;
        o.present = true;
        o.max_size = max_size;
        persist_override = true;
    }

    PolicyOutcome {
        config,
        changed,
        persist_override,
        rule: if changed { rule } else { None },
    }
}

fn upgrade_to_best_bc7(o: &mut PlatformOverride) {
    o.format = TextureFormat::Bc7;
    o.quality = CompressionQuality::Best;
}
