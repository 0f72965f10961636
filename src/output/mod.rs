mod log;
mod preview;

pub use log::{LoggedSample, SampleLog};
pub use preview::{annotate, PreviewWriter};

use anyhow::Result;
use image::RgbImage;

use crate::label::{OrientedRect, RotatedBoundingBox};

/// One accepted sample as handed to a recorder.
#[derive(Debug, Clone, Copy)]
pub struct SampleRecord<'a> {
    pub class_index: usize,
    pub video_index: usize,
    pub position: usize,
    pub composite: &'a RgbImage,
    pub corners: OrientedRect,
    pub bbox: RotatedBoundingBox,
}

/// Trait for sample destinations
pub trait SampleRecorder {
    /// Store one sample
    fn record_sample(&mut self, record: &SampleRecord<'_>) -> Result<()>;

    /// Number of samples stored so far
    fn sample_count(&self) -> usize;
}
