use super::FrameSource;
use anyhow::{bail, Context, Result};
use image::RgbImage;
use std::path::{Path, PathBuf};

const FRAME_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// A video stored as a directory of extracted frames, ordered by file name.
pub struct FrameDirSource {
    dir: PathBuf,
    frames: Vec<PathBuf>,
    position: usize,
}

impl FrameDirSource {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();

        let mut frames = Vec::new();
        for entry in std::fs::read_dir(&dir)
            .with_context(|| format!("Failed to list frames in {}", dir.display()))?
        {
            let path = entry?.path();
            if path.is_file() && is_frame_file(&path) {
                frames.push(path);
            }
        }
        frames.sort();

        tracing::info!("Opened {} with {} frames", dir.display(), frames.len());

        Ok(Self {
            dir,
            frames,
            position: 0,
        })
    }
}

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| FRAME_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

impl FrameSource for FrameDirSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        let Some(path) = self.frames.get(self.position) else {
            return Ok(None);
        };

        let frame = image::open(path)
            .with_context(|| format!("Failed to read frame {}", path.display()))?
            .to_rgb8();
        self.position += 1;

        Ok(Some(frame))
    }

    fn seek(&mut self, index: usize) -> Result<()> {
        if index > self.frames.len() {
            bail!(
                "Frame {} is past the end of {} ({} frames)",
                index,
                self.dir.display(),
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
        self.dir.display().to_string()
    }
}
