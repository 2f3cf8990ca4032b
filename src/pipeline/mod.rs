//! Pipeline — orchestration of enroll/detect operations.
//!
//! # Flow
//!
//! ```text
//! enroll(name, secs)                       detect(secs)
//!   validate input                           require ≥2 profiles
//!   Prompt → Recorder::capture               Recorder::capture
//!   MfccExtractor::extract                   MfccExtractor::extract
//!   ProfileStore::put (persist)              ClassifierManager::predict
//!   ClassifierManager::retrain (≥2)          Info("Detected voice: …")
//!   Info + refreshed profile list
//! ```

pub mod presenter;
pub mod runner;
pub mod state;

pub use presenter::{ConsolePresenter, Presenter};
pub use runner::{Orchestrator, PipelineError};
pub use state::OpPhase;

#[cfg(test)]
pub use presenter::RecordingPresenter;
