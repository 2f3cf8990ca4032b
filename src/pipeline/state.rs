//! Per-operation state machine.
//!
//! Each enroll/detect call walks a fixed sequence of phases:
//!
//! ```text
//! Idle ──▶ Capturing ──▶ Extracting ──▶ Persisting ──▶ Done   (enroll)
//!                                   └─▶ Predicting ──▶ Done   (detect)
//! any phase ──error──▶ Failed
//! ```
//!
//! `Done` and `Failed` are terminal; no partial transition is retried. The
//! orchestrator records the phase so failures can be attributed to a step.

// ---------------------------------------------------------------------------
// OpPhase
// ---------------------------------------------------------------------------

/// Phases of a single enroll or detect operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpPhase {
    /// No operation in flight.
    #[default]
    Idle,

    /// Blocking on the capture device for the requested duration.
    Capturing,

    /// Computing the MFCC fingerprint of the captured clip.
    Extracting,

    /// Writing the profile (and retraining the classifier) — enroll path.
    Persisting,

    /// Querying the trained classifier — detect path.
    Predicting,

    /// Operation completed successfully.
    Done,

    /// Operation aborted on a signaled error.
    Failed,
}

impl OpPhase {
    /// `true` for the two terminal phases.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OpPhase::Done | OpPhase::Failed)
    }

    /// A short human-readable label for logs and status lines.
    pub fn label(&self) -> &'static str {
        match self {
            OpPhase::Idle => "Idle",
            OpPhase::Capturing => "Capturing",
            OpPhase::Extracting => "Extracting",
            OpPhase::Persisting => "Persisting",
            OpPhase::Predicting => "Predicting",
            OpPhase::Done => "Done",
            OpPhase::Failed => "Failed",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
