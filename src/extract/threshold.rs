use image::{GrayImage, Luma, RgbImage};

use crate::config::Polarity;

/// Convert an RGB frame to 8-bit luma using BT.601 weights.
pub fn to_gray(frame: &RgbImage) -> GrayImage {
    let _span = tracing::debug_span!("grayscale").entered();

    GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
        let pixel = frame.get_pixel(x, y);
        Luma([luma(pixel[0], pixel[1], pixel[2])])
    })
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    let r = r as f32;
    let g = g as f32;
    let b = b as f32;

    (0.299 * r + 0.587 * g + 0.114 * b).round().clamp(0.0, 255.0) as u8
}

/// Binarize a grayscale frame into a 0/255 image where 255 marks the object side.
///
/// With [`Polarity::DarkObject`] pixels strictly below `threshold` become 255.
pub fn binarize(gray: &GrayImage, threshold: u8, polarity: Polarity) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let below = gray.get_pixel(x, y)[0] < threshold;
        let object = match polarity {
            Polarity::DarkObject => below,
            Polarity::BrightObject => !below,
        };
        Luma([if object { 255 } else { 0 }])
    })
}
