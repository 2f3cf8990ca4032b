//! Audio acquisition — microphone capture → downmix → resampling → validation.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → AudioChunk (mpsc) → downmix_to_mono
//!           → resample → ClipValidator → feature extraction
//! ```
//!
//! The rest of the crate only sees the [`Recorder`] trait: a blocking call
//! that produces N seconds of mono PCM at the pipeline sample rate.

pub mod capture;
pub mod quality;
pub mod resample;

pub use capture::{CaptureError, CpalRecorder, Recorder};
pub use quality::{ClipError, ClipValidator};
pub use resample::{downmix_to_mono, resample};

// test-only re-export so pipeline tests can import the mock directly.
#[cfg(test)]
pub use capture::MockRecorder;
