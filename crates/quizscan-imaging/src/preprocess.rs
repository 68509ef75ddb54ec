//! [`EnhancingPreprocessor`]: decode → fit → enhance → JPEG.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::GenericImageView;
use tracing::debug;

use quizscan_core::error::PreprocessError;
use quizscan_core::model::PreparedImage;
use quizscan_core::traits::ImagePreprocessor;

use crate::enhance::EnhancementParams;

#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Longest allowed side, in pixels. Larger captures are scaled down.
    pub max_dimension: u32,
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
    pub enhancement: EnhancementParams,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            max_dimension: 1600,
            jpeg_quality: 90,
            enhancement: EnhancementParams::default(),
        }
    }
}

/// The production [`ImagePreprocessor`].
///
/// Output never exceeds `max_dimension` on its longer side, keeps the
/// capture's aspect ratio, and is the same bytes for the same input.
#[derive(Debug, Clone, Default)]
pub struct EnhancingPreprocessor {
    config: PreprocessConfig,
}

impl EnhancingPreprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }
}

impl ImagePreprocessor for EnhancingPreprocessor {
    fn preprocess(&self, raw: &[u8]) -> Result<PreparedImage, PreprocessError> {
        let decoded =
            image::load_from_memory(raw).map_err(|e| PreprocessError::ImageDecode(e.to_string()))?;
        let (src_w, src_h) = decoded.dimensions();

        let fitted = match fit_within(src_w, src_h, self.config.max_dimension) {
            Some((w, h)) => decoded.resize_exact(w, h, FilterType::CatmullRom),
            None => decoded,
        };

        let mut rgb = fitted.to_rgb8();
        self.config.enhancement.apply(&mut rgb);
        let (width, height) = rgb.dimensions();

        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, self.config.jpeg_quality)
            .encode_image(&rgb)
            .map_err(|e| PreprocessError::Encode(e.to_string()))?;

        debug!(
            src_width = src_w,
            src_height = src_h,
            width,
            height,
            bytes = bytes.len(),
            "normalized capture"
        );
        Ok(PreparedImage::new(bytes, "image/jpeg", width, height))
    }
}

/// Target size when `(w, h)` exceeds `max` on either side, else `None`.
fn fit_within(w: u32, h: u32, max: u32) -> Option<(u32, u32)> {
    let longest = w.max(h);
    if longest <= max || longest == 0 {
        return None;
    }
    let scale = max as f64 / longest as f64;
    let scaled = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, max);
    Some((scaled(w), scaled(h)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn large_capture_fits_longer_side() {
        let out = EnhancingPreprocessor::default()
            .preprocess(&png(3200, 1600))
            .unwrap();
        assert_eq!((out.width, out.height), (1600, 800));
        assert_eq!(out.mime_type, "image/jpeg");

        let decoded = image::load_from_memory(&out.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (1600, 800));
    }

    #[test]
    fn portrait_capture_fits_height() {
        let out = EnhancingPreprocessor::default()
            .preprocess(&png(900, 2400))
            .unwrap();
        assert_eq!((out.width, out.height), (600, 1600));
    }

    #[test]
    fn small_capture_keeps_its_size() {
        let out = EnhancingPreprocessor::default()
            .preprocess(&png(640, 480))
            .unwrap();
        assert_eq!((out.width, out.height), (640, 480));
    }

    #[test]
    fn output_is_jpeg() {
        let out = EnhancingPreprocessor::default().preprocess(&png(32, 32)).unwrap();
        assert_eq!(&out.bytes[..3], &[0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn undecodable_bytes_are_image_decode_errors() {
        let err = EnhancingPreprocessor::default()
            .preprocess(b"definitely not an image")
            .unwrap_err();
        assert!(matches!(err, PreprocessError::ImageDecode(_)));
    }

    #[test]
    fn same_input_same_output() {
        let raw = png(200, 120);
        let pre = EnhancingPreprocessor::default();
        assert_eq!(pre.preprocess(&raw).unwrap(), pre.preprocess(&raw).unwrap());
    }

    #[test]
    fn fit_rounds_and_never_hits_zero() {
        assert_eq!(fit_within(1601, 3, 1600), Some((1600, 3)));
        assert_eq!(fit_within(10_000, 1, 1600), Some((1600, 1)));
        assert_eq!(fit_within(1600, 1600, 1600), None);
        assert_eq!(fit_within(0, 0, 1600), None);
    }

    #[test]
    fn custom_max_dimension() {
        let pre = EnhancingPreprocessor::new(PreprocessConfig {
            max_dimension: 100,
            ..PreprocessConfig::default()
        });
        let out = pre.preprocess(&png(400, 300)).unwrap();
        assert_eq!((out.width, out.height), (100, 75));
    }
}
