use std::path::{Path, PathBuf};

use image::{imageops, RgbImage};

use crate::error::{Result, SynthError};

/// File extensions accepted as background images.
const BACKGROUND_EXTENSIONS: [&str; 2] = ["jpg", "png"];

/// A background either read from disk on use or held in memory.
#[derive(Debug, Clone)]
pub enum Background {
    File(PathBuf),
    Image(RgbImage),
}

impl Background {
    pub fn load(&self) -> Result<RgbImage> {
        match self {
            Background::File(path) => {
                let image = image::open(path).map_err(|source| SynthError::Background {
                    path: path.clone(),
                    source,
                })?;
                Ok(image.to_rgb8())
            }
            Background::Image(image) => Ok(image.clone()),
        }
    }
}

/// Fixed, ordered background list consumed round-robin.
#[derive(Debug, Clone)]
pub struct BackgroundCycle {
    backgrounds: Vec<Background>,
    next: usize,
}

impl BackgroundCycle {
    pub fn new(backgrounds: Vec<Background>) -> Result<Self> {
        if backgrounds.is_empty() {
            return Err(SynthError::NoBackgrounds);
        }
        Ok(Self {
            backgrounds,
            next: 0,
        })
    }

    /// Every `.jpg`/`.png` file directly inside `dir`, sorted by path.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let accepted = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| BACKGROUND_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
            if path.is_file() && accepted {
                paths.push(path);
            }
        }
        paths.sort();

        tracing::info!("Found {} background images in {}", paths.len(), dir.display());
        Self::new(paths.into_iter().map(Background::File).collect())
    }

    pub fn from_images(images: Vec<RgbImage>) -> Result<Self> {
        Self::new(images.into_iter().map(Background::Image).collect())
    }

    pub fn len(&self) -> usize {
        self.backgrounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backgrounds.is_empty()
    }

    /// Index of the background the next call to [`Self::next_background`] returns.
    pub fn position(&self) -> usize {
        self.next
    }

    /// Load the current background and advance the cycle.
    pub fn next_background(&mut self) -> Result<RgbImage> {
        let background = &self.backgrounds[self.next];
        self.next = (self.next + 1) % self.backgrounds.len();
        background.load()
    }
}

/// Resize a background to exactly the frame dimensions.
pub fn fit_background(background: &RgbImage, width: u32, height: u32) -> RgbImage {
    if background.dimensions() == (width, height) {
        return background.clone();
    }
    imageops::resize(background, width, height, imageops::FilterType::Triangle)
}
