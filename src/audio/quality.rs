//! Pre-extraction validation of a captured clip.
//!
//! [`ClipValidator`] checks a mono `f32` recording before it reaches the
//! MFCC extractor:
//!
//! | Check | Description |
//! |-------|-------------|
//! | Duration | Clip must be within `[min_secs, max_secs]` |
//! | Silence | At least one sample must exceed an amplitude threshold |
//!
//! A clip that fails here aborts the in-flight enroll/detect operation
//! before any persistent state is touched.

use thiserror::Error;

use crate::config::AudioConfig;

// ---------------------------------------------------------------------------
// ClipError
// ---------------------------------------------------------------------------

/// Reason a captured clip failed validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClipError {
    /// Recording is shorter than the configured minimum.
    #[error("recording too short: {got_secs:.2}s (minimum {min_secs:.2}s)")]
    TooShort { min_secs: f32, got_secs: f32 },

    /// Recording is longer than the configured maximum.
    #[error("recording too long: {got_secs:.2}s (maximum {max_secs:.2}s)")]
    TooLong { max_secs: f32, got_secs: f32 },

    /// All samples are below the silence floor — the spectrogram of such a
    /// clip is degenerate and would produce a meaningless fingerprint.
    #[error("recording is silent: max amplitude {amplitude:.5} (threshold {threshold:.5})")]
    Silent { amplitude: f32, threshold: f32 },
}

// ---------------------------------------------------------------------------
// ClipValidator
// ---------------------------------------------------------------------------

/// Validates a captured clip before feature extraction.
pub struct ClipValidator {
    /// Sample rate the clip is expressed in (Hz).
    pub sample_rate: u32,
    /// Minimum allowed duration in seconds.
    pub min_secs: f32,
    /// Maximum allowed duration in seconds.
    pub max_secs: f32,
    /// Minimum peak amplitude for the clip to count as non-silent.
    pub silence_threshold: f32,
}

impl ClipValidator {
    /// Build a validator from the audio configuration.
    pub fn from_config(audio: &AudioConfig) -> Self {
        Self {
            sample_rate: audio.sample_rate,
            min_secs: audio.min_recording_secs,
            max_secs: audio.max_recording_secs,
            silence_threshold: 1e-4,
        }
    }

    /// Validate a mono clip.
    ///
    /// Returns `Ok(())` when all checks pass, or the first [`ClipError`]
    /// encountered otherwise. Checks run in order: too short → too long →
    /// silent.
    pub fn validate(&self, audio: &[f32]) -> Result<(), ClipError> {
        let duration_secs = audio.len() as f32 / self.sample_rate as f32;

        if duration_secs < self.min_secs {
            return Err(ClipError::TooShort {
                min_secs: self.min_secs,
                got_secs: duration_secs,
            });
        }

        if duration_secs > self.max_secs {
            return Err(ClipError::TooLong {
                max_secs: self.max_secs,
                got_secs: duration_secs,
            });
        }

        let max_amplitude = audio.iter().map(|s| s.abs()).fold(0.0_f32, f32::max);
        if max_amplitude < self.silence_threshold {
            return Err(ClipError::Silent {
                amplitude: max_amplitude,
                threshold: self.silence_threshold,
            });
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> ClipValidator {
        ClipValidator::from_config(&AudioConfig::default())
    }

    fn make_clip(secs: f32, amplitude: f32) -> Vec<f32> {
        let n = (secs * 16_000.0) as usize;
        vec![amplitude; n]
    }

    #[test]
    fn valid_clip_passes() {
        assert!(validator().validate(&make_clip(1.0, 0.3)).is_ok());
    }

    #[test]
    fn too_short_rejected() {
        let err = validator().validate(&make_clip(0.1, 0.3)).unwrap_err();
        assert!(matches!(err, ClipError::TooShort { .. }), "{err}");
    }

    #[test]
    fn too_long_rejected() {
        let err = validator().validate(&make_clip(31.0, 0.3)).unwrap_err();
        assert!(matches!(err, ClipError::TooLong { .. }), "{err}");
    }

    #[test]
    fn silent_clip_rejected() {
        let err = validator().validate(&make_clip(1.0, 0.0)).unwrap_err();
        assert!(matches!(err, ClipError::Silent { .. }), "{err}");
    }

    #[test]
    fn at_minimum_duration_passes() {
        // Exactly 0.5 s at 16 kHz.
        assert!(validator().validate(&make_clip(0.5, 0.2)).is_ok());
    }

    #[test]
    fn error_display_is_informative() {
        let err = ClipError::TooShort {
            min_secs: 0.5,
            got_secs: 0.1,
        };
        let msg = err.to_string();
        assert!(msg.contains("0.10"), "message: {msg}");
        assert!(msg.contains("0.50"), "message: {msg}");
    }
}
