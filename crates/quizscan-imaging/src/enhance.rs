//! Fixed colour enhancement, applied per pixel.
//!
//! The three adjustments compose like a CSS filter chain
//! (`brightness() contrast() saturate()`): each step works on channel values
//! in `0.0..=1.0` and clamps before the next one runs.

use image::RgbImage;

/// Multipliers for the enhancement chain. `1.0` leaves a channel unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnhancementParams {
    pub brightness: f32,
    /// Scales distance from mid-grey.
    pub contrast: f32,
    pub saturation: f32,
}

impl Default for EnhancementParams {
    fn default() -> Self {
        Self {
            brightness: 1.10,
            contrast: 1.25,
            saturation: 1.15,
        }
    }
}

impl EnhancementParams {
    /// Parameters that leave every pixel as it is.
    pub fn identity() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
        }
    }

    /// Enhance `image` in place.
    pub fn apply(&self, image: &mut RgbImage) {
        // Brightness and contrast act on each channel independently.
        let lut = self.tone_table();
        let sat = SaturationMatrix::new(self.saturation);

        for pixel in image.pixels_mut() {
            let toned = [
                lut[pixel[0] as usize],
                lut[pixel[1] as usize],
                lut[pixel[2] as usize],
            ];
            pixel.0 = sat.apply(toned).map(to_u8);
        }
    }

    fn tone_table(&self) -> [f32; 256] {
        let mut table = [0.0f32; 256];
        for (value, slot) in table.iter_mut().enumerate() {
            let c = value as f32 / 255.0;
            let c = (c * self.brightness).clamp(0.0, 1.0);
            *slot = ((c - 0.5) * self.contrast + 0.5).clamp(0.0, 1.0);
        }
        table
    }
}

/// The `saturate()` colour matrix, built on Rec. 709 luma weights.
struct SaturationMatrix([[f32; 3]; 3]);

impl SaturationMatrix {
    fn new(s: f32) -> Self {
        Self([
            [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
            [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
            [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
        ])
    }

    fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let m = &self.0;
        [0, 1, 2].map(|row| {
            (m[row][0] * rgb[0] + m[row][1] * rgb[1] + m[row][2] * rgb[2]).clamp(0.0, 1.0)
        })
    }
}

fn to_u8(c: f32) -> u8 {
    (c * 255.0).round() as u8
}
