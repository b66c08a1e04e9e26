//! Pixel-level transform operations

use crate::config::TintConfig;
use crate::transform::TransformError;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Per-channel multipliers applied by the tint transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TintFactors {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Default for TintFactors {
    fn default() -> Self {
        TintConfig::default().into()
    }
}

impl From<TintConfig> for TintFactors {
    fn from(config: TintConfig) -> Self {
        Self {
            red: config.red,
            green: config.green,
            blue: config.blue,
        }
    }
}

/// The pixel operations behind the built-in transforms
///
/// Each operation takes encoded image bytes and returns encoded bytes.
pub trait PixelOps: Send + Sync {
    fn grayscale(&self, image: &[u8]) -> Result<Vec<u8>, TransformError>;

    fn sepia(&self, image: &[u8]) -> Result<Vec<u8>, TransformError>;

    fn tint(&self, image: &[u8], factors: TintFactors) -> Result<Vec<u8>, TransformError>;
}

/// [`PixelOps`] backed by the `image` crate; outputs are PNG encoded
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageOps;

impl PixelOps for ImageOps {
    fn grayscale(&self, image: &[u8]) -> Result<Vec<u8>, TransformError> {
        let decoded = image::load_from_memory(image)?;
        encode_png(&DynamicImage::ImageRgba8(decoded.grayscale().to_rgba8()))
    }

    fn sepia(&self, image: &[u8]) -> Result<Vec<u8>, TransformError> {
        map_pixels(image, |Rgba([r, g, b, a])| {
            let (r, g, b) = (r as f32, g as f32, b as f32);
            Rgba([
                channel(0.393 * r + 0.769 * g + 0.189 * b),
                channel(0.349 * r + 0.686 * g + 0.168 * b),
                channel(0.272 * r + 0.534 * g + 0.131 * b),
                a,
            ])
        })
    }

    fn tint(&self, image: &[u8], factors: TintFactors) -> Result<Vec<u8>, TransformError> {
        map_pixels(image, |Rgba([r, g, b, a])| {
            Rgba([
                channel(r as f32 * factors.red),
                channel(g as f32 * factors.green),
                channel(b as f32 * factors.blue),
                a,
            ])
        })
    }
}

/// Decodes, rewrites every RGBA pixel and re-encodes as PNG
fn map_pixels<F>(image: &[u8], f: F) -> Result<Vec<u8>, TransformError>
where
    F: Fn(Rgba<u8>) -> Rgba<u8>,
{
    let mut rgba: RgbaImage = image::load_from_memory(image)?.to_rgba8();
    for pixel in rgba.pixels_mut() {
        *pixel = f(*pixel);
    }
    encode_png(&DynamicImage::ImageRgba8(rgba))
}

fn channel(value: f32) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, TransformError> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_of(color: [u8; 4]) -> Vec<u8> {
        let image = RgbaImage::from_pixel(2, 2, Rgba(color));
        encode_png(&DynamicImage::ImageRgba8(image)).unwrap()
    }

    fn first_pixel(bytes: &[u8]) -> Rgba<u8> {
        *image::load_from_memory(bytes)
            .unwrap()
            .to_rgba8()
            .get_pixel(0, 0)
    }

    #[test]
    fn test_grayscale_equalizes_channels() {
        let output = ImageOps.grayscale(&png_of([255, 0, 0, 255])).unwrap();
        let Rgba([r, g, b, a]) = first_pixel(&output);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert!(r > 0 && r < 255);
        assert_eq!(a, 255);
    }

    #[test]
    fn test_grayscale_is_written_as_rgba() {
        let output = ImageOps.grayscale(&png_of([10, 200, 30, 90])).unwrap();
        let decoded = image::load_from_memory(&output).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgba8);
        assert_eq!(first_pixel(&output).0[3], 90);
    }

    #[test]
    fn test_sepia_on_white() {
        let output = ImageOps.sepia(&png_of([255, 255, 255, 255])).unwrap();
        assert_eq!(first_pixel(&output), Rgba([255, 255, 238, 255]));
    }

    #[test]
    fn test_sepia_keeps_alpha() {
        let output = ImageOps.sepia(&png_of([10, 20, 30, 128])).unwrap();
        assert_eq!(first_pixel(&output).0[3], 128);
    }

    #[test]
    fn test_tint_scales_channels() {
        let factors = TintFactors {
            red: 0.2,
            green: 0.5,
            blue: 0.7,
        };
        let output = ImageOps.tint(&png_of([255, 255, 255, 255]), factors).unwrap();
        assert_eq!(first_pixel(&output), Rgba([51, 127, 178, 255]));
    }

    #[test]
    fn test_undecodable_bytes_fail() {
        let garbage = b"definitely not an image";
        assert!(matches!(
            ImageOps.grayscale(garbage),
            Err(TransformError::Image(_))
        ));
        assert!(ImageOps.sepia(garbage).is_err());
        assert!(ImageOps.tint(garbage, TintFactors::default()).is_err());
    }

    #[test]
    fn test_default_factors_match_config_defaults() {
        let factors = TintFactors::default();
        assert_eq!(factors.red, 0.2);
        assert_eq!(factors.green, 0.5);
        assert_eq!(factors.blue, 0.7);
    }
}
