//! Microphone capture via `cpal`, behind the [`Recorder`] trait.
//!
//! The pipeline asks for "N seconds of mono PCM at the pipeline rate" and
//! nothing else, so capture is a single blocking call:
//!
//! ```text
//! Recorder::capture(secs)
//!   └─▶ cpal input stream → AudioChunk (mpsc) → downmix_to_mono → resample
//! ```
//!
//! [`CpalRecorder`] is the production implementation. [`MockRecorder`]
//! (test-only) returns canned samples so the orchestrator can be tested
//! without an input device.

use std::sync::mpsc;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

use crate::audio::resample::{downmix_to_mono, resample};

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors that can occur while setting up or running audio capture.
#[derive(Debug, Error, Clone)]
pub enum CaptureError {
    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("failed to query default input config: {0}")]
    DefaultConfig(String),

    #[error("failed to build input stream: {0}")]
    BuildStream(String),

    #[error("failed to start audio stream: {0}")]
    PlayStream(String),

    /// The device stopped delivering samples before the requested duration
    /// was captured.
    #[error("audio stream stalled after {received} of {expected} samples")]
    Stalled { received: usize, expected: usize },
}

// ---------------------------------------------------------------------------
// Recorder trait
// ---------------------------------------------------------------------------

/// Blocking audio acquisition.
///
/// # Contract
///
/// - Blocks the calling thread for the full requested duration (recording is
///   not cancellable mid-clip).
/// - Returns **mono f32 PCM at the pipeline sample rate**, approximately
///   `duration_secs * sample_rate` samples long.
pub trait Recorder {
    /// Record `duration_secs` of audio and return the mono samples.
    fn capture(&self, duration_secs: f32) -> Result<Vec<f32>, CaptureError>;
}

// Compile-time assertion: Box<dyn Recorder> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Recorder>) {}
};

// ---------------------------------------------------------------------------
// AudioChunk
// ---------------------------------------------------------------------------

/// A single buffer of raw audio as delivered by the cpal callback.
///
/// Samples are interleaved `f32` in `[-1.0, 1.0]` at the device's native
/// rate and channel count.
#[derive(Debug, Clone)]
struct AudioChunk {
    samples: Vec<f32>,
}

// ---------------------------------------------------------------------------
// CpalRecorder
// ---------------------------------------------------------------------------

/// Production [`Recorder`] over the system default input device.
///
/// The device's preferred stream configuration is queried once at
/// construction; each [`capture`](Recorder::capture) call builds a fresh
/// stream, accumulates chunks for the requested duration, then downmixes
/// and resamples to the pipeline rate.
pub struct CpalRecorder {
    device: cpal::Device,
    config: cpal::StreamConfig,
    /// Native sample rate reported by the device (Hz).
    native_rate: u32,
    /// Number of interleaved channels reported by the device.
    channels: u16,
    /// Rate the returned samples are resampled to (Hz).
    target_rate: u32,
}

impl CpalRecorder {
    /// Create a recorder using the system default input device, resampling
    /// every captured clip to `target_rate` Hz.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::NoDevice`] when no input device is available,
    /// or [`CaptureError::DefaultConfig`] when the device cannot report a
    /// default stream configuration.
    pub fn new(target_rate: u32) -> Result<Self, CaptureError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;

        let supported = device
            .default_input_config()
            .map_err(|e| CaptureError::DefaultConfig(e.to_string()))?;

        let channels = supported.channels();
        let native_rate = supported.sample_rate().0;
        let config: cpal::StreamConfig = supported.into();

        log::info!("input device ready ({native_rate} Hz, {channels} ch)");

        Ok(Self {
            device,
            config,
            native_rate,
            channels,
            target_rate,
        })
    }

    /// Native sample rate of the capture device in Hz.
    pub fn native_rate(&self) -> u32 {
        self.native_rate
    }
}

impl Recorder for CpalRecorder {
    fn capture(&self, duration_secs: f32) -> Result<Vec<f32>, CaptureError> {
        let (tx, rx) = mpsc::channel::<AudioChunk>();

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    // Ignore send errors; the receiver is dropped once
                    // enough samples have arrived.
                    let _ = tx.send(AudioChunk {
                        samples: data.to_vec(),
                    });
                },
                |err: cpal::StreamError| {
                    log::error!("cpal stream error: {err}");
                },
                None,
            )
            .map_err(|e| CaptureError::BuildStream(e.to_string()))?;

        stream
            .play()
            .map_err(|e| CaptureError::PlayStream(e.to_string()))?;

        log::debug!("recording for {duration_secs:.1} s");

        // Accumulate interleaved native-rate samples until the requested
        // duration is covered. The extra second on the timeout covers
        // device startup latency.
        let wanted =
            (duration_secs * self.native_rate as f32) as usize * self.channels as usize;
        let timeout = Duration::from_secs_f32(duration_secs + 1.0);
        let mut raw: Vec<f32> = Vec::with_capacity(wanted);

        while raw.len() < wanted {
            match rx.recv_timeout(timeout) {
                Ok(chunk) => raw.extend_from_slice(&chunk.samples),
                Err(_) => {
                    return Err(CaptureError::Stalled {
                        received: raw.len(),
                        expected: wanted,
                    })
                }
            }
        }
        drop(stream);

        raw.truncate(wanted);
        let mono = downmix_to_mono(&raw, self.channels);
        let out = resample(&mono, self.native_rate, self.target_rate);

        log::debug!("captured {} samples at {} Hz", out.len(), self.target_rate);
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// MockRecorder  (test-only)
// ---------------------------------------------------------------------------

/// A test double that plays back canned responses and counts how many times
/// it was asked to record.
///
/// With a single response the mock repeats it forever; with a sequence it
/// pops one response per call and repeats the last.
#[cfg(test)]
pub struct MockRecorder {
    responses: std::cell::RefCell<std::collections::VecDeque<Result<Vec<f32>, CaptureError>>>,
    calls: std::cell::Cell<usize>,
}

#[cfg(test)]
impl MockRecorder {
    /// Create a mock that always returns `Ok(samples)`.
    pub fn ok(samples: Vec<f32>) -> Self {
        Self::sequence(vec![Ok(samples)])
    }

    /// Create a mock that always returns `Err(error)`.
    pub fn err(error: CaptureError) -> Self {
        Self::sequence(vec![Err(error)])
    }

    /// Create a mock that plays back `responses` in order.
    pub fn sequence(responses: Vec<Result<Vec<f32>, CaptureError>>) -> Self {
        assert!(!responses.is_empty(), "mock needs at least one response");
        Self {
            responses: std::cell::RefCell::new(responses.into()),
            calls: std::cell::Cell::new(0),
        }
    }

    /// Number of `capture` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

#[cfg(test)]
impl Recorder for MockRecorder {
    fn capture(&self, _duration_secs: f32) -> Result<Vec<f32>, CaptureError> {
        self.calls.set(self.calls.get() + 1);
        let mut queue = self.responses.borrow_mut();
        if queue.len() > 1 {
            queue.pop_front().expect("non-empty queue")
        } else {
            queue.front().cloned().expect("non-empty queue")
        }
    }
}

// Forwarding impl so tests can keep a handle to a mock that the
// orchestrator owns through a `Box<dyn Recorder>`.
impl<R: Recorder + ?Sized> Recorder for std::rc::Rc<R> {
    fn capture(&self, duration_secs: f32) -> Result<Vec<f32>, CaptureError> {
        (**self).capture(duration_secs)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_configured_samples() {
        let recorder = MockRecorder::ok(vec![0.5_f32; 100]);
        let audio = recorder.capture(1.0).expect("capture");
        assert_eq!(audio.len(), 100);
        assert_eq!(recorder.calls(), 1);
    }

    #[test]
    fn mock_returns_configured_error() {
        let recorder = MockRecorder::err(CaptureError::NoDevice);
        let err = recorder.capture(1.0).unwrap_err();
        assert!(matches!(err, CaptureError::NoDevice));
    }

    #[test]
    fn mock_counts_calls() {
        let recorder = MockRecorder::ok(vec![]);
        let _ = recorder.capture(1.0);
        let _ = recorder.capture(1.0);
        assert_eq!(recorder.calls(), 2);
    }

    /// A sequenced mock plays responses in order and repeats the last one.
    #[test]
    fn mock_sequence_plays_in_order() {
        let recorder = MockRecorder::sequence(vec![
            Ok(vec![0.1_f32; 10]),
            Ok(vec![0.2_f32; 20]),
        ]);
        assert_eq!(recorder.capture(1.0).unwrap().len(), 10);
        assert_eq!(recorder.capture(1.0).unwrap().len(), 20);
        // Last response repeats.
        assert_eq!(recorder.capture(1.0).unwrap().len(), 20);
    }

    #[test]
    fn box_dyn_recorder_compiles() {
        // If this test compiles, the trait is object-safe.
        let recorder: Box<dyn Recorder> = Box::new(MockRecorder::ok(vec![0.0; 10]));
        let _ = recorder.capture(0.5);
    }

    #[test]
    fn capture_error_display_mentions_counts() {
        let err = CaptureError::Stalled {
            received: 100,
            expected: 48_000,
        };
        let msg = err.to_string();
        assert!(msg.contains("100"), "{msg}");
        assert!(msg.contains("48000"), "{msg}");
    }
}
