//! Orchestrator — drives the capture → extract → persist/predict pipeline.
//!
//! [`Orchestrator`] owns the long-lived application state (profile store +
//! classifier manager) plus the stateless collaborators (extractor, clip
//! validator, recorder) and enforces the business rules the individual
//! components do not:
//!
//! - enroll: non-empty name, positive duration, retrain once ≥2 profiles
//!   exist (a single profile is an informational state, not an error);
//! - detect: ≥2 profiles required **before** any capture is attempted.
//!
//! Every error is caught here, recorded as the [`OpPhase::Failed`] terminal
//! phase, and surfaced to the [`Presenter`] as a human-readable message.
//! Failed steps abort before mutating persistent state.

use thiserror::Error;

use crate::audio::{CaptureError, ClipError, ClipValidator, Recorder};
use crate::classifier::{ClassifierError, ClassifierManager};
use crate::features::{ExtractionError, MfccExtractor};
use crate::profile::{ProfileStore, StoreError};

use super::presenter::Presenter;
use super::state::OpPhase;

/// Phrase the user is asked to repeat while enrolling.
const ENROLLMENT_PHRASE: &str =
    "Please repeat the following phrase: 'Hello, I am learning to recognize your voice.'";

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Unified error surfaced at the orchestrator boundary.
///
/// Wraps every component error so the presenter sees one human-readable
/// message regardless of which step failed.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad name or duration before any capture is attempted.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("recording failed: {0}")]
    Capture(#[from] CaptureError),

    /// The captured clip failed validation (too short/long, silent).
    #[error("recording rejected: {0}")]
    Clip(#[from] ClipError),

    #[error("feature extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("could not store profile: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Sequences enrollment and recognition operations.
///
/// Single-threaded and synchronous: one operation runs at a time, blocking
/// for the full capture duration, and both the store and the model are fully
/// updated and persisted before the call returns.
pub struct Orchestrator {
    store: ProfileStore,
    classifier: ClassifierManager,
    extractor: MfccExtractor,
    validator: ClipValidator,
    recorder: Box<dyn Recorder>,
    phase: OpPhase,
}

impl Orchestrator {
    /// Assemble an orchestrator from its collaborators.
    pub fn new(
        store: ProfileStore,
        classifier: ClassifierManager,
        extractor: MfccExtractor,
        validator: ClipValidator,
        recorder: Box<dyn Recorder>,
    ) -> Self {
        Self {
            store,
            classifier,
            extractor,
            validator,
            recorder,
            phase: OpPhase::Idle,
        }
    }

    /// Phase the most recent operation ended in (`Idle` before the first).
    pub fn phase(&self) -> OpPhase {
        self.phase
    }

    /// Enrolled speaker names, sorted ascending.
    pub fn profile_names(&self) -> Vec<String> {
        self.store.names()
    }

    // -----------------------------------------------------------------------
    // enroll
    // -----------------------------------------------------------------------

    /// Record `duration_secs` of audio and enroll it as `name`'s profile.
    ///
    /// On success the profile is persisted and, once at least two voices are
    /// enrolled, the classifier is retrained and persisted as well. Any
    /// failure aborts the operation, reports through the presenter, and
    /// leaves store and classifier exactly as they were before the failed
    /// step.
    pub fn enroll(
        &mut self,
        name: &str,
        duration_secs: f32,
        presenter: &mut dyn Presenter,
    ) -> Result<(), PipelineError> {
        let result = self.enroll_inner(name, duration_secs, presenter);
        self.finish(&result, presenter);
        result
    }

    fn enroll_inner(
        &mut self,
        name: &str,
        duration_secs: f32,
        presenter: &mut dyn Presenter,
    ) -> Result<(), PipelineError> {
        self.phase = OpPhase::Idle;

        if name.is_empty() {
            return Err(PipelineError::InvalidInput(
                "speaker name must not be empty".into(),
            ));
        }
        if !(duration_secs > 0.0) {
            return Err(PipelineError::InvalidInput(format!(
                "recording duration must be positive (got {duration_secs})"
            )));
        }

        presenter.prompt(ENROLLMENT_PHRASE);

        log::info!("enrolling '{name}' ({duration_secs:.1} s)");
        self.phase = OpPhase::Capturing;
        let audio = self.recorder.capture(duration_secs)?;

        self.phase = OpPhase::Extracting;
        self.validator.validate(&audio)?;
        let vector = self.extractor.extract(&audio)?;

        self.phase = OpPhase::Persisting;
        self.store.put(name, vector)?;

        if self.store.count() >= 2 {
            self.classifier.retrain(&self.store.all())?;
            presenter.info("Voice recognition model updated.");
        } else {
            // Not an error — a one-profile store just cannot detect yet.
            presenter.info("Profile stored. Enroll at least one more voice to enable detection.");
        }

        presenter.profiles(&self.store.names());
        presenter.info(&format!("Voice registered successfully as '{name}'."));
        Ok(())
    }

    // -----------------------------------------------------------------------
    // detect
    // -----------------------------------------------------------------------

    /// Record `duration_secs` of audio and identify the speaker.
    ///
    /// Requires at least two enrolled profiles; the precondition is checked
    /// before the capture device is touched.
    pub fn detect(
        &mut self,
        duration_secs: f32,
        presenter: &mut dyn Presenter,
    ) -> Result<String, PipelineError> {
        let result = self.detect_inner(duration_secs, presenter);
        self.finish(&result, presenter);
        result
    }

    fn detect_inner(
        &mut self,
        duration_secs: f32,
        presenter: &mut dyn Presenter,
    ) -> Result<String, PipelineError> {
        self.phase = OpPhase::Idle;

        if self.store.count() < 2 {
            return Err(ClassifierError::InsufficientData {
                have: self.store.count(),
            }
            .into());
        }
        if !(duration_secs > 0.0) {
            return Err(PipelineError::InvalidInput(format!(
                "recording duration must be positive (got {duration_secs})"
            )));
        }

        log::info!("detecting speaker ({duration_secs:.1} s)");
        self.phase = OpPhase::Capturing;
        let audio = self.recorder.capture(duration_secs)?;

        self.phase = OpPhase::Extracting;
        self.validator.validate(&audio)?;
        let vector = self.extractor.extract(&audio)?;

        self.phase = OpPhase::Predicting;
        let name = self.classifier.predict(&vector)?;

        presenter.info(&format!("Detected voice: {name}"));
        Ok(name)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Record the terminal phase and surface a failure to the presenter.
    fn finish<T>(&mut self, result: &Result<T, PipelineError>, presenter: &mut dyn Presenter) {
        match result {
            Ok(_) => {
                self.phase = OpPhase::Done;
            }
            Err(e) => {
                self.phase = OpPhase::Failed;
                log::error!("operation failed: {e}");
                presenter.error(&e.to_string());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
