use super::{SampleRecord, SampleRecorder};
use anyhow::Result;

use crate::label::{OrientedRect, RotatedBoundingBox};

/// Label data of a recorded sample, without the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoggedSample {
    pub class_index: usize,
    pub video_index: usize,
    pub position: usize,
    pub dimensions: (u32, u32),
    pub corners: OrientedRect,
    pub bbox: RotatedBoundingBox,
}

/// In-memory recorder, for callers that export labels themselves.
#[derive(Debug, Default)]
pub struct SampleLog {
    entries: Vec<LoggedSample>,
}

impl SampleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LoggedSample] {
        &self.entries
    }

    /// Samples recorded for one class.
    pub fn class_count(&self, class_index: usize) -> usize {
        self.entries
            .iter()
            .filter(|e| e.class_index == class_index)
            .count()
    }
}

impl SampleRecorder for SampleLog {
    fn record_sample(&mut self, record: &SampleRecord<'_>) -> Result<()> {
        self.entries.push(LoggedSample {
            class_index: record.class_index,
            video_index: record.video_index,
            position: record.position,
            dimensions: record.composite.dimensions(),
            corners: record.corners,
            bbox: record.bbox,
        });
        Ok(())
    }

    fn sample_count(&self) -> usize {
        self.entries.len()
    }
}
