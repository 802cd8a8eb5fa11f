//! `TextureImporter` block of a `.meta` file
//!
//! Newer editors keep the importer-wide compression settings in the
//! `DefaultTexturePlatform` entry of `platformSettings`; older ones write them
//! as top-level importer keys. Reads prefer the platform entry and fall back
//! to the top-level key. Writes go wherever the key already lives.

use super::document::{Block, MetaDocument};
use super::MetaError;
use crate::textures::{
    AlphaSource, CompressionMode, CompressionQuality, MipmapFilter, PlatformOverride, TextureFormat,
    TextureImportConfig, TextureRole,
};

/// Build target holding the importer-wide defaults
pub const DEFAULT_PLATFORM: &str = "DefaultTexturePlatform";

const DEFAULT_MAX_SIZE: u32 = 2048;

/// Importer values read from a `.meta` file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImporterSettings {
    /// Source dimensions are zero and the inferred format is `Automatic`
    /// until the caller fills them in.
    pub config: TextureImportConfig,
    pub alpha_source: AlphaSource,
    pub alpha_is_transparency: bool,
}

/// A parsed `.meta` file with a `TextureImporter` block
#[derive(Debug, Clone)]
pub struct TextureImporterMeta {
    doc: MetaDocument,
    platform: String,
}

impl TextureImporterMeta {
    /// Parse `.meta` text for the given build target (e.g. `Standalone`)
    pub fn parse(text: &str, platform: &str) -> Result<Self, MetaError> {
        let doc = MetaDocument::parse(text);
        if doc.root_block("TextureImporter").is_none() {
            return Err(MetaError::NotATextureImporter);
        }
        Ok(Self {
            doc,
            platform: platform.to_string(),
        })
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn read(&self) -> Result<ImporterSettings, MetaError> {
        let importer = self.importer()?;

        let crunched = self.importer_int("crunchedCompression")?.unwrap_or(0) != 0;
        let compression_mode =
            CompressionMode::from_code(self.importer_int("textureCompression")?.unwrap_or(1));
        let max_size = match self.importer_int("maxTextureSize")? {
            Some(v) => to_u32("maxTextureSize", v)?,
            None => DEFAULT_MAX_SIZE,
        };
        let mipmap_filter = MipmapFilter::from_code(self.mip_int()?.unwrap_or(0));
        let texture_role =
            TextureRole::from_code(self.int_in(&importer, "textureType")?.unwrap_or(0));
        let alpha_source =
            AlphaSource::from_code(self.int_in(&importer, "alphaUsage")?.unwrap_or(1));
        let alpha_is_transparency =
            self.int_in(&importer, "alphaIsTransparency")?.unwrap_or(0) != 0;

        let platform_override = match self.platform_entry(&self.platform) {
            Some(entry) => PlatformOverride {
                present: true,
                format: TextureFormat::from_code(
                    self.int_in(&entry, "textureFormat")?.unwrap_or(-1),
                ),
                quality: CompressionQuality::from_code(
                    self.int_in(&entry, "compressionQuality")?.unwrap_or(50),
                ),
                overridden: self.int_in(&entry, "overridden")?.unwrap_or(0) != 0,
                max_size: match self.int_in(&entry, "maxTextureSize")? {
                    Some(v) => to_u32("maxTextureSize", v)?,
                    None => max_size,
                },
            },
            None => PlatformOverride {
                max_size,
                ..PlatformOverride::default()
            },
        };

        Ok(ImporterSettings {
            config: TextureImportConfig {
                crunched,
                mipmap_filter,
                max_size,
                source_width: 0,
                source_height: 0,
                texture_role,
                compression_mode,
                platform_override,
                inferred_default_format: TextureFormat::Automatic,
            },
            alpha_source,
            alpha_is_transparency,
        })
    }

    /// Write the fields of `new` that differ from `old`. With
    /// `persist_override` the whole platform block is written, creating the
    /// platform entry if needed. Returns whether the text changed.
    pub fn write(
        &mut self,
        old: &TextureImportConfig,
        new: &TextureImportConfig,
        persist_override: bool,
    ) -> Result<bool, MetaError> {
        let mut dirty = false;

        if new.crunched != old.crunched {
            dirty |= self.set_importer_field("crunchedCompression", bool_code(new.crunched))?;
        }
        if new.compression_mode != old.compression_mode {
            dirty |= self.set_importer_field("textureCompression", new.compression_mode.code())?;
        }
        if new.mipmap_filter != old.mipmap_filter {
            dirty |= self.set_mip_filter(new.mipmap_filter)?;
        }

        if persist_override {
            let o = &new.platform_override;
            dirty |= self.ensure_platform_entry()?;
            dirty |= self.set_platform_field("maxTextureSize", o.max_size as i64)?;
            dirty |= self.set_platform_field("textureFormat", o.format.code())?;
            dirty |= self.set_platform_field("compressionQuality", o.quality.code())?;
            dirty |= self.set_platform_field("overridden", bool_code(o.overridden))?;
        }

        Ok(dirty)
    }

    pub fn document(&self) -> &MetaDocument {
        &self.doc
    }

    fn importer(&self) -> Result<Block, MetaError> {
        self.doc
            .root_block("TextureImporter")
            .ok_or(MetaError::NotATextureImporter)
    }

    fn platform_settings(&self) -> Option<Block> {
        let importer = self.doc.root_block("TextureImporter")?;
        self.doc.child_block(&importer, "platformSettings")
    }

    fn platform_entry(&self, target: &str) -> Option<Block> {
        let seq = self.platform_settings()?;
        self.doc
            .items(&seq)
            .into_iter()
            .find(|item| self.doc.scalar(item, "buildTarget") == Some(target))
    }

    fn int_in(&self, block: &Block, key: &str) -> Result<Option<i64>, MetaError> {
        match self.doc.scalar(block, key) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse::<i64>().map(Some).map_err(|_| MetaError::InvalidValue {
                key: key.to_string(),
                value: raw.to_string(),
            }),
        }
    }

    /// Importer-wide value: default platform entry first, then top-level key
    fn importer_int(&self, key: &str) -> Result<Option<i64>, MetaError> {
        if let Some(entry) = self.platform_entry(DEFAULT_PLATFORM) {
            if let Some(v) = self.int_in(&entry, key)? {
                return Ok(Some(v));
            }
        }
        self.int_in(&self.importer()?, key)
    }

    fn mip_int(&self) -> Result<Option<i64>, MetaError> {
        let importer = self.importer()?;
        if let Some(mipmaps) = self.doc.child_block(&importer, "mipmaps") {
            if let Some(v) = self.int_in(&mipmaps, "mipMapMode")? {
                return Ok(Some(v));
            }
        }
        self.int_in(&importer, "mipMapMode")
    }

    fn set_importer_field(&mut self, key: &str, value: i64) -> Result<bool, MetaError> {
        let importer = self.importer()?;
        let entry = self.platform_entry(DEFAULT_PLATFORM);

        let target = match entry {
            Some(entry) if self.doc.find_key(&entry, key).is_some() => entry,
            _ if self.doc.find_key(&importer, key).is_some() => importer,
            Some(entry) => entry,
            None => importer,
        };
        Ok(self.doc.upsert_scalar(&target, key, &value.to_string()))
    }

    fn set_mip_filter(&mut self, filter: MipmapFilter) -> Result<bool, MetaError> {
        let importer = self.importer()?;
        let value = filter.code().to_string();
        let mipmaps = self.doc.child_block(&importer, "mipmaps");

        // Same lookup order as `mip_int`
        let target = match mipmaps {
            Some(mipmaps) if self.doc.find_key(&mipmaps, "mipMapMode").is_some() => mipmaps,
            _ if self.doc.find_key(&importer, "mipMapMode").is_some() => importer,
            Some(mipmaps) => mipmaps,
            None => importer,
        };
        Ok(self.doc.upsert_scalar(&target, "mipMapMode", &value))
    }

    fn ensure_platform_entry(&mut self) -> Result<bool, MetaError> {
        if self.platform_entry(&self.platform).is_some() {
            return Ok(false);
        }
        let seq = self
            .platform_settings()
            .filter(|seq| !self.doc.items(seq).is_empty())
            .ok_or_else(|| MetaError::MissingPlatformSettings(self.platform.clone()))?;

        let platform = self.platform.clone();
        let item = match self.platform_entry(DEFAULT_PLATFORM) {
            Some(template) => self.doc.clone_item(&seq, &template),
            None => {
                let dash_indent = self.doc.items(&seq)[0].indent - 2;
                self.doc.push_item(
                    &seq,
                    dash_indent,
                    &[
                        ("serializedVersion", "3".to_string()),
                        ("buildTarget", platform.clone()),
                    ],
                )
            }
        };
        self.doc.upsert_scalar(&item, "buildTarget", &platform);
        Ok(true)
    }

    fn set_platform_field(&mut self, key: &str, value: i64) -> Result<bool, MetaError> {
        let entry = self
            .platform_entry(&self.platform)
            .ok_or_else(|| MetaError::MissingPlatformSettings(self.platform.clone()))?;
        Ok(self.doc.upsert_scalar(&entry, key, &value.to_string()))
    }
}

fn bool_code(value: bool) -> i64 {
    i64::from(value)
}

fn to_u32(key: &str, value: i64) -> Result<u32, MetaError> {
    u32::try_from(value).map_err(|_| MetaError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
