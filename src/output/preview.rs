use super::{SampleRecord, SampleRecorder};
use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};

const CORNERS_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const START_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const START_RADIUS: i32 = 10;

/// Saves each composite with its label drawn on top, for visual checks.
pub struct PreviewWriter {
    dir: PathBuf,
    written: usize,
}

impl PreviewWriter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create preview directory {}", dir.display()))?;

        tracing::info!("Writing previews to {}", dir.display());

        Ok(Self { dir, written: 0 })
    }

    fn file_name(&self, record: &SampleRecord<'_>) -> PathBuf {
        self.dir.join(format!(
            "{:06}_c{}_v{}_f{}.png",
            self.written, record.class_index, record.video_index, record.position
        ))
    }
}

/// Draw the label onto a copy of the composite.
///
/// Green: transformed rectangle corners. Red: the box `(x, y, w, h)` before
/// rotation. White dot: corner 0.
pub fn annotate(record: &SampleRecord<'_>) -> RgbImage {
    let mut image = record.composite.clone();

    for i in 0..4 {
        let (a, b) = (record.corners[i], record.corners[(i + 1) % 4]);
        draw_line_segment_mut(
            &mut image,
            (a.x as f32, a.y as f32),
            (b.x as f32, b.y as f32),
            CORNERS_COLOR,
        );
    }

    let bbox = &record.bbox;
    let (width, height) = (bbox.width.round() as i64, bbox.height.round() as i64);
    if width > 0 && height > 0 {
        let rect = Rect::at(bbox.x as i32, bbox.y as i32).of_size(width as u32, height as u32);
        draw_hollow_rect_mut(&mut image, rect, BOX_COLOR);
    }

    draw_filled_circle_mut(&mut image, (bbox.x as i32, bbox.y as i32), START_RADIUS, START_COLOR);

    image
}

impl SampleRecorder for PreviewWriter {
    fn record_sample(&mut self, record: &SampleRecord<'_>) -> Result<()> {
        let path = self.file_name(record);
        annotate(record)
            .save(&path)
            .with_context(|| format!("Failed to write preview {}", path.display()))?;
        self.written += 1;
        Ok(())
    }

    fn sample_count(&self) -> usize {
        self.written
    }
}
