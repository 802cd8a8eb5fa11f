//! Source image probing
//!
//! Reads the image header for dimensions and color type. Pixel data is only
//! decoded when the color type carries alpha, to check whether any texel is
//! actually translucent.

use anyhow::{Context, Result};
use image::{ColorType, DynamicImage, ImageDecoder, ImageReader};
use std::path::Path;
use tracing::{debug, warn};

/// Header facts about an authored texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceInfo {
    pub width: u32,
    pub height: u32,
    /// An alpha channel with at least one texel below full opacity
    pub has_alpha: bool,
    pub is_hdr: bool,
}

/// Read `path`, decoding pixels only for color types with alpha
pub fn read_source_info(path: &Path) -> Result<SourceInfo> {
    let reader = ImageReader::open(path)
        .with_context(|| format!("Failed to open {:?}", path))?
        .with_guessed_format()
        .with_context(|| format!("Failed to detect image format of {:?}", path))?;
    let decoder = reader
        .into_decoder()
        .with_context(|| format!("Failed to read image header of {:?}", path))?;

    let (width, height) = decoder.dimensions();
    let color = decoder.color_type();
    let is_hdr = matches!(color, ColorType::Rgb32F | ColorType::Rgba32F);

    let has_alpha = if color.has_alpha() {
        match DynamicImage::from_decoder(decoder) {
            Ok(image) => {
                let translucent = has_translucent_texel(&image);
                debug!("{:?} has an alpha channel, translucent: {}", path, translucent);
                translucent
            }
            Err(e) => {
                // Trust the header when pixels can't be decoded
                warn!("Failed to decode {:?} for alpha scan: {}", path, e);
                true
            }
        }
    } else {
        false
    };

    Ok(SourceInfo {
        width,
        height,
        has_alpha,
        is_hdr,
    })
}

fn has_translucent_texel(image: &DynamicImage) -> bool {
    match image {
        DynamicImage::ImageRgba8(img) => img.pixels().any(|p| p.0[3] < u8::MAX),
        DynamicImage::ImageLumaA8(img) => img.pixels().any(|p| p.0[1] < u8::MAX),
        DynamicImage::ImageRgba16(img) => img.pixels().any(|p| p.0[3] < u16::MAX),
        DynamicImage::ImageLumaA16(img) => img.pixels().any(|p| p.0[1] < u16::MAX),
        DynamicImage::ImageRgba32F(img) => img.pixels().any(|p| p.0[3] < 1.0),
        other => other.to_rgba8().pixels().any(|p| p.0[3] < u8::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_source_opaque_png() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("opaque.png");
        RgbImage::from_pixel(300, 40, Rgb([10, 20, 30])).save(&path).unwrap();

        let info = read_source_info(&path).unwrap();
        assert_eq!((info.width, info.height), (300, 40));
        assert!(!info.has_alpha);
        assert!(!info.is_hdr);
    }

    #[test]
    fn test_source_alpha_png() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("alpha.png");
        RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 128])).save(&path).unwrap();

        assert!(read_source_info(&path).unwrap().has_alpha);
    }

    #[test]
    fn test_source_rgba_png_fully_opaque() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("opaque_rgba.png");
        RgbaImage::from_pixel(2048, 2048, Rgba([90, 60, 30, 255])).save(&path).unwrap();

        let info = read_source_info(&path).unwrap();
        assert_eq!((info.width, info.height), (2048, 2048));
        assert!(!info.has_alpha);
    }

    #[test]
    fn test_source_single_translucent_texel() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("one_hole.png");
        let mut img = RgbaImage::from_pixel(64, 64, Rgba([255, 255, 255, 255]));
        img.put_pixel(63, 63, Rgba([255, 255, 255, 254]));
        img.save(&path).unwrap();

        assert!(read_source_info(&path).unwrap().has_alpha);
    }

    #[test]
    fn test_source_garbage() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        assert!(read_source_info(&path).is_err());
    }
}
