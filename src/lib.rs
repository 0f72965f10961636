//! Synthetic training data for object detectors.
//!
//! A foreground object is cut out of a video frame, recolored, moved to a
//! random pose inside the frame and pasted onto a background, and the
//! object's oriented bounding box is derived for the new pose. See
//! [`pipeline::synthesize`] for one frame and [`session::Session`] for
//! class-balanced sampling over many videos.

pub mod augment;
pub mod capture;
pub mod composite;
pub mod config;
pub mod error;
pub mod extract;
pub mod label;
pub mod output;
pub mod pipeline;
pub mod session;
pub mod transform;

pub use config::SynthConfig;
pub use error::{Result, SynthError};
pub use pipeline::{synthesize, Sample};
pub use session::{Advance, SampleClass, Session};
