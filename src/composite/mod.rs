mod background;

pub use background::{fit_background, Background, BackgroundCycle};

use glam::DAffine2;
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::geometric_transformations::{warp, Projection};

use crate::config::CompositeConfig;
use crate::error::{Result, SynthError};
use crate::transform::to_projection;

/// Which source a composite pixel is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelSource {
    Background,
    Foreground,
    /// Weighted mix along the contour seam.
    Blended,
}

impl PixelSource {
    /// The edge band takes precedence over the mask.
    pub fn classify(mask: u8, edge: u8) -> Self {
        if edge != 0 {
            PixelSource::Blended
        } else if mask != 0 {
            PixelSource::Foreground
        } else {
            PixelSource::Background
        }
    }
}

/// Frame layers after the placement transform.
#[derive(Debug, Clone)]
pub struct WarpedLayers {
    pub image: RgbImage,
    pub mask: GrayImage,
    pub edges: GrayImage,
}

/// Warps the object layers and pastes them onto a background.
pub struct Compositor {
    config: CompositeConfig,
}

impl Compositor {
    pub fn new(config: CompositeConfig) -> Self {
        Self { config }
    }

    /// Apply one affine map to image, mask and edge layer with the same interpolation.
    pub fn warp_layers(
        &self,
        image: &RgbImage,
        mask: &GrayImage,
        edges: &GrayImage,
        affine: &DAffine2,
    ) -> Result<WarpedLayers> {
        let _span = tracing::debug_span!("warp_layers").entered();

        let expected = image.dimensions();
        for actual in [mask.dimensions(), edges.dimensions()] {
            if actual != expected {
                return Err(SynthError::DimensionMismatch { expected, actual });
            }
        }

        // Non-singular by construction (scale > 0); the planner rejects zero radii.
        let projection: Projection = to_projection(affine).ok_or(SynthError::InvalidTransformBounds {
            quantity: "scale",
            low: 0.0,
            high: 0.0,
        })?;
        let interpolation = self.config.interpolation;

        Ok(WarpedLayers {
            image: warp(image, &projection, interpolation, Rgb([0, 0, 0])),
            mask: warp(mask, &projection, interpolation, Luma([0])),
            edges: warp(edges, &projection, interpolation, Luma([0])),
        })
    }

    /// Hard-composite through the mask and soften the seam with a weighted blend.
    pub fn composite(&self, layers: &WarpedLayers, background: &RgbImage) -> Result<RgbImage> {
        let _span = tracing::debug_span!("composite").entered();

        let (width, height) = layers.image.dimensions();
        for actual in [layers.mask.dimensions(), layers.edges.dimensions()] {
            if actual != (width, height) {
                return Err(SynthError::DimensionMismatch {
                    expected: (width, height),
                    actual,
                });
            }
        }

        let background = fit_background(background, width, height);
        let (bg_weight, fg_weight) = (self.config.background_weight, self.config.foreground_weight);

        Ok(RgbImage::from_fn(width, height, |x, y| {
            let bg = background.get_pixel(x, y);
            let fg = layers.image.get_pixel(x, y);
            let source = PixelSource::classify(
                layers.mask.get_pixel(x, y)[0],
                layers.edges.get_pixel(x, y)[0],
            );

            match source {
                PixelSource::Background => *bg,
                PixelSource::Foreground => *fg,
                PixelSource::Blended => Rgb([0, 1, 2].map(|c| {
                    let mixed = bg_weight * bg[c] as f32 + fg_weight * fg[c] as f32;
                    mixed.round().clamp(0.0, 255.0) as u8
                })),
            }
        }))
    }
}
