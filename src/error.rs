use thiserror::Error;

/// Failures raised by the sample synthesis stages.
#[derive(Debug, Error)]
pub enum SynthError {
    /// No contour survived the area and border filters.
    #[error("no foreground object found in frame")]
    NoForegroundFound,

    /// None of the four transformed rectangle edges lies within ±45° of the x-axis.
    #[error("bounding box orientation is ambiguous")]
    AmbiguousOrientation,

    /// A sampling interval is empty or inverted for the detected object size.
    #[error("invalid transform bounds for {quantity}: [{low}, {high}]")]
    InvalidTransformBounds {
        quantity: &'static str,
        low: f64,
        high: f64,
    },

    #[error("layer dimensions {actual:?} do not match frame dimensions {expected:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("no background images available")]
    NoBackgrounds,

    #[error("failed to read background {}: {source}", path.display())]
    Background {
        path: std::path::PathBuf,
        source: image::ImageError,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SynthError {
    /// Whether the driver may skip the current frame and carry on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SynthError::NoForegroundFound | SynthError::AmbiguousOrientation
        )
    }
}

pub type Result<T> = std::result::Result<T, SynthError>;
