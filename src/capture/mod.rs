mod frame_dir;
mod memory;

pub use frame_dir::FrameDirSource;
pub use memory::MemorySource;

use anyhow::Result;
use image::RgbImage;

/// Trait for positionable frame sources (one per video)
pub trait FrameSource {
    /// Read the frame at the current position and advance past it
    ///
    /// Returns `None` once the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<RgbImage>>;

    /// Move to a frame index; the next read returns that frame
    fn seek(&mut self, index: usize) -> Result<()>;

    /// Index of the frame the next read returns
    fn position(&self) -> usize;

    /// Total number of frames
    fn frame_count(&self) -> usize;

    /// Human-readable name for logs
    fn name(&self) -> String;
}
