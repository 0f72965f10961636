mod hsv;

pub use hsv::{hsv_to_rgb, rgb_to_hsv, HUE_RANGE};

use image::{Rgb, RgbImage};
use rand::Rng;

use crate::config::AugmentationConfig;

/// One draw of per-channel HSV offsets.
///
/// The hue offset is in hue units; saturation and value offsets are percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HsvOffsets {
    pub hue: i32,
    pub saturation: i32,
    pub value: i32,
}

impl HsvOffsets {
    /// Draw each offset from `[-max, max)`; channels with a zero max stay at zero.
    pub fn sample<R: Rng + ?Sized>(config: &AugmentationConfig, rng: &mut R) -> Self {
        let mut draw = |max: u8| {
            let max = max as i32;
            if max == 0 {
                0
            } else {
                rng.random_range(-max..max)
            }
        };

        Self {
            hue: draw(config.hue_shift_max),
            saturation: draw(config.saturation_shift_max),
            value: draw(config.value_shift_max),
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// Shift a single HSV pixel.
    pub fn apply(&self, hsv: [u8; 3]) -> [u8; 3] {
        let [h, s, v] = hsv;

        let h = if self.hue == 0 {
            h
        } else {
            (h as i32 + self.hue).rem_euclid(HUE_RANGE) as u8
        };

        [h, scale_percent(s, self.saturation), scale_percent(v, self.value)]
    }
}

fn scale_percent(channel: u8, offset: i32) -> u8 {
    if offset == 0 {
        return channel;
    }
    let scaled = channel as f32 * (100 + offset) as f32 / 100.0;
    scaled.clamp(0.0, 255.0) as u8
}

/// Random hue/saturation/value perturbation of color frames.
pub struct ColorAugmenter {
    config: AugmentationConfig,
}

impl ColorAugmenter {
    pub fn new(config: AugmentationConfig) -> Self {
        Self { config }
    }

    pub fn augment<R: Rng + ?Sized>(&self, frame: &RgbImage, rng: &mut R) -> RgbImage {
        let offsets = HsvOffsets::sample(&self.config, rng);
        tracing::debug!(?offsets, "color offsets");
        apply_offsets(frame, offsets)
    }
}

/// Apply fixed offsets to every pixel; zero offsets leave the frame untouched.
pub fn apply_offsets(frame: &RgbImage, offsets: HsvOffsets) -> RgbImage {
    let _span = tracing::debug_span!("augment_color").entered();

    if offsets.is_zero() {
        return frame.clone();
    }

    let mut out = frame.clone();
    for pixel in out.pixels_mut() {
        let hsv = offsets.apply(rgb_to_hsv(pixel.0));
        *pixel = Rgb(hsv_to_rgb(hsv));
    }
    out
}
