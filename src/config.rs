use imageproc::geometric_transformations::Interpolation;

/// Which side of the threshold counts as the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    /// Object is darker than the threshold (bright backdrop).
    #[default]
    DarkObject,
    /// Object is at or above the threshold (dark backdrop).
    BrightObject,
}

/// Per-frame color augmentation and binarization settings.
///
/// The driver re-reads this on every frame, so a controller may change it
/// between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AugmentationConfig {
    /// Maximum hue offset in OpenCV hue units (0..180).
    pub hue_shift_max: u8,
    /// Maximum saturation change in percent.
    pub saturation_shift_max: u8,
    /// Maximum value change in percent.
    pub value_shift_max: u8,
    /// Grayscale binarization threshold.
    pub threshold: u8,
    pub polarity: Polarity,
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self {
            hue_shift_max: 10,
            saturation_shift_max: 15,
            value_shift_max: 15,
            threshold: 250,
            polarity: Polarity::DarkObject,
        }
    }
}

impl AugmentationConfig {
    pub fn is_identity(&self) -> bool {
        self.hue_shift_max == 0 && self.saturation_shift_max == 0 && self.value_shift_max == 0
    }
}

/// Contour rejection thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractorConfig {
    /// Contours with `sqrt(area / frame_area)` at or below this are specks.
    pub min_side_ratio: f64,
    /// Bounding rectangles closer than this to a frame edge are rejected.
    pub border_margin: u32,
    /// Rejects contours whose `(w + h) / (W + H)` reaches this.
    pub max_extent_ratio: f64,
    /// Width in pixels of the seam band drawn along the contour.
    pub edge_width: u32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_side_ratio: 0.10,
            border_margin: 5,
            max_extent_ratio: 0.9,
            edge_width: 3,
        }
    }
}

/// Object size and placement limits for the random transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerConfig {
    /// Smallest transformed diameter as a fraction of the shorter frame side.
    pub min_size_ratio: f64,
    /// Largest transformed diameter as a fraction of the shorter frame side.
    pub max_size_ratio: f64,
    /// Gap kept between the transformed enclosing circle and the frame edge.
    pub margin: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            min_size_ratio: 0.2,
            max_size_ratio: 0.3,
            margin: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CompositeConfig {
    /// Shared by image, mask and edge warps so the layers stay aligned.
    pub interpolation: Interpolation,
    pub background_weight: f32,
    pub foreground_weight: f32,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            interpolation: Interpolation::Nearest,
            background_weight: 0.7,
            foreground_weight: 0.3,
        }
    }
}

/// Everything a single synthesis call reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct SynthConfig {
    pub augment: AugmentationConfig,
    pub extract: ExtractorConfig,
    pub planner: PlannerConfig,
    pub composite: CompositeConfig,
}
