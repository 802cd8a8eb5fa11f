//! texture-upgrader - better texture compression without more VRAM
//!
//! Rewrites Unity texture importer settings: crunch off, Kaiser mips,
//! tiny textures uncompressed, BC5 normal maps and BC7 where DXT1/DXT5
//! would otherwise be picked.

pub mod meta;
pub mod settings;
pub mod textures;
pub mod upgrader;
