use super::FrameSource;
use anyhow::{bail, Result};
use image::RgbImage;

/// Frame source over frames already held in memory.
pub struct MemorySource {
    name: String,
    frames: Vec<RgbImage>,
    position: usize,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, frames: Vec<RgbImage>) -> Self {
        Self {
            name: name.into(),
            frames,
            position: 0,
        }
    }
}

impl FrameSource for MemorySource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        let frame = self.frames.get(self.position).cloned();
        if frame.is_some() {
            self.position += 1;
        }
        Ok(frame)
    }

    fn seek(&mut self, index: usize) -> Result<()> {
        if index > self.frames.len() {
            bail!(
                "Frame {} is past the end of {} ({} frames)",
                index,
                self.name,
                self.frames.len()
            );
        }
        self.position = index;
        Ok(())
    }

    fn position(&self) -> usize {
        self.position
    }

    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}
