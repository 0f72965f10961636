use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;

use crate::capture::{FrameDirSource, FrameSource};
use crate::composite::BackgroundCycle;
use crate::config::SynthConfig;
use crate::error::SynthError;
use crate::output::SampleRecord;
use crate::pipeline::{synthesize, Sample};

/// One object class and the videos it is sampled from.
pub struct SampleClass {
    pub name: String,
    pub videos: Vec<Box<dyn FrameSource>>,
}

impl SampleClass {
    pub fn new(name: impl Into<String>, videos: Vec<Box<dyn FrameSource>>) -> Self {
        Self {
            name: name.into(),
            videos,
        }
    }

    /// Every sub-directory of `dir` is one video of frames.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());

        let videos = sorted_subdirs(dir)?
            .into_iter()
            .map(|path| {
                FrameDirSource::open(&path).map(|source| Box::new(source) as Box<dyn FrameSource>)
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("Class {}: {} videos", name, videos.len());
        Ok(Self::new(name, videos))
    }
}

/// Load every class directory under `root`, in sorted order.
pub fn load_classes<P: AsRef<Path>>(root: P) -> Result<Vec<SampleClass>> {
    sorted_subdirs(root.as_ref())?
        .into_iter()
        .map(SampleClass::from_dir)
        .collect()
}

fn sorted_subdirs(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    let mut dirs = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// A sample together with where its frame came from.
#[derive(Debug, Clone)]
pub struct SessionSample {
    pub class_index: usize,
    pub video_index: usize,
    /// Index of the frame within its video.
    pub position: usize,
    pub sample: Sample,
}

impl SessionSample {
    pub fn record(&self) -> SampleRecord<'_> {
        SampleRecord {
            class_index: self.class_index,
            video_index: self.video_index,
            position: self.position,
            composite: &self.sample.composite,
            corners: self.sample.label.corners,
            bbox: self.sample.label.bbox,
        }
    }
}

/// Outcome of one [`Session::advance`] call.
#[derive(Debug)]
pub enum Advance {
    Sample(Box<SessionSample>),
    /// The frame was rejected; the session moved past it.
    Skipped {
        class_index: usize,
        video_index: usize,
        position: usize,
        reason: SynthError,
    },
    /// Every class reached its target or ran out of usable frames.
    Finished,
}

/// Balanced sampling across classes, one frame per call.
///
/// Samples are drawn from the current class until it reaches the target or
/// runs out of videos; the session then moves to the unfinished class with
/// the fewest samples. A class whose full pass over its videos yields nothing
/// is marked exhausted and never revisited.
pub struct Session {
    classes: Vec<SampleClass>,
    backgrounds: BackgroundCycle,
    target: usize,
    counts: Vec<usize>,
    exhausted: Vec<bool>,
    class: usize,
    video: usize,
    rewind: bool,
    pass_samples: usize,
    finished: bool,
}

impl Session {
    pub fn new(classes: Vec<SampleClass>, backgrounds: BackgroundCycle, target: usize) -> Self {
        let exhausted = classes.iter().map(|c| c.videos.is_empty()).collect();
        let mut session = Self {
            counts: vec![0; classes.len()],
            exhausted,
            classes,
            backgrounds,
            target,
            class: 0,
            video: 0,
            rewind: true,
            pass_samples: 0,
            finished: false,
        };
        session.switch_class();
        session
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|c| c.name.as_str())
    }

    /// Accepted samples per class.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn exhausted(&self) -> &[bool] {
        &self.exhausted
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn total_samples(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Current `(class, video)` cursor.
    pub fn cursor(&self) -> (usize, usize) {
        (self.class, self.video)
    }

    /// Read and process the next frame.
    ///
    /// Per-frame rejections come back as [`Advance::Skipped`]; configuration
    /// faults and I/O failures are errors.
    pub fn advance<R: Rng + ?Sized>(&mut self, config: &SynthConfig, rng: &mut R) -> Result<Advance> {
        loop {
            if self.finished {
                return Ok(Advance::Finished);
            }

            let (class_index, video_index) = (self.class, self.video);
            let source = &mut self.classes[class_index].videos[video_index];
            if self.rewind {
                source.seek(0)?;
                self.rewind = false;
                tracing::debug!("Playing {} ({} frames)", source.name(), source.frame_count());
            }

            let position = source.position();
            let Some(frame) = source
                .next_frame()
                .with_context(|| format!("Failed to read frame {} of {}", position, source.name()))?
            else {
                self.end_of_video();
                continue;
            };

            return match synthesize(&frame, &mut self.backgrounds, config, rng) {
                Ok(sample) => {
                    self.counts[class_index] += 1;
                    self.pass_samples += 1;
                    if self.counts[class_index] >= self.target {
                        tracing::info!(
                            "Class {} reached {} samples",
                            self.classes[class_index].name,
                            self.target
                        );
                        self.switch_class();
                    }
                    Ok(Advance::Sample(Box::new(SessionSample {
                        class_index,
                        video_index,
                        position,
                        sample,
                    })))
                }
                Err(reason) if reason.is_recoverable() => {
                    tracing::debug!("Skipping frame {}: {}", position, reason);
                    Ok(Advance::Skipped {
                        class_index,
                        video_index,
                        position,
                        reason,
                    })
                }
                Err(e) => Err(e).with_context(|| {
                    format!(
                        "Failed to synthesize frame {} of {}",
                        position,
                        self.classes[class_index].videos[video_index].name()
                    )
                }),
            };
        }
    }

    fn end_of_video(&mut self) {
        self.video += 1;
        if self.video < self.classes[self.class].videos.len() {
            self.rewind = true;
            return;
        }

        if self.pass_samples == 0 {
            tracing::warn!(
                "Class {} yielded no samples from any video, giving up on it",
                self.classes[self.class].name
            );
            self.exhausted[self.class] = true;
        }
        self.switch_class();
    }

    /// Move to the unfinished class with the fewest samples, or finish.
    fn switch_class(&mut self) {
        let next = (0..self.classes.len())
            .filter(|&i| !self.exhausted[i] && self.counts[i] < self.target)
            .min_by_key(|&i| self.counts[i]);

        match next {
            Some(class) => {
                self.class = class;
                self.video = 0;
                self.rewind = true;
                self.pass_samples = 0;
            }
            None => {
                tracing::info!("All classes done: {:?}", self.counts);
                self.finished = true;
            }
        }
    }
}
