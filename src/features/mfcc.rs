//! Mean-MFCC feature extraction.
//!
//! [`MfccExtractor`] turns a variable-length mono clip into a fixed-length
//! acoustic fingerprint: the per-coefficient arithmetic mean of the MFCC
//! matrix over all analysis frames. Mean pooling deliberately discards
//! temporal structure so that recordings of different lengths stay
//! comparable; what remains is the overall spectral envelope, which is what
//! separates speakers.
//!
//! ```text
//! samples → STFT power → mel filterbank → ln → DCT-II → mean over frames
//!                                                       (13 values)
//! ```

use ndarray::{Array2, Axis};
use thiserror::Error;

use crate::config::FeatureConfig;
use crate::features::mel::{mel_filterbank, power_spectrogram};

/// Floor added before the log so silent bands stay finite.
const LOG_GUARD: f32 = 1e-10;

/// Peak amplitude below which a clip counts as silence.
const SILENCE_FLOOR: f32 = 1e-4;

// ---------------------------------------------------------------------------
// ExtractionError
// ---------------------------------------------------------------------------

/// Reasons feature extraction can fail. On any of these the in-flight
/// enroll/detect operation aborts without touching persistent state.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("waveform is empty")]
    Empty,

    /// Not enough samples for a single analysis window.
    #[error("waveform too short: {got} samples (need at least {min})")]
    TooShort { min: usize, got: usize },

    /// The clip is all-silence; its spectrogram is degenerate.
    #[error("waveform is silent (peak amplitude {amplitude:.6})")]
    Silent { amplitude: f32 },

    /// The computed coefficients contain NaN or infinity.
    #[error("extraction produced non-finite coefficients")]
    Degenerate,
}

// ---------------------------------------------------------------------------
// MfccExtractor
// ---------------------------------------------------------------------------

/// Computes mean-MFCC feature vectors from mono PCM at a fixed sample rate.
///
/// The mel filterbank and DCT basis are precomputed at construction, so
/// [`extract`](Self::extract) is allocation-light and the extractor can be
/// reused across operations.
pub struct MfccExtractor {
    sample_rate: u32,
    num_coefficients: usize,
    fft_size: usize,
    hop_size: usize,
    filterbank: Array2<f32>,
    dct: Array2<f32>,
}

impl MfccExtractor {
    /// Build an extractor for the given configuration and sample rate.
    pub fn new(config: &FeatureConfig, sample_rate: u32) -> Self {
        let filterbank = mel_filterbank(
            sample_rate,
            config.fft_size,
            config.num_mel_bands,
            0.0,
            sample_rate as f64 / 2.0,
        );
        let dct = dct_basis(config.num_coefficients, config.num_mel_bands);

        Self {
            sample_rate,
            num_coefficients: config.num_coefficients,
            fft_size: config.fft_size,
            hop_size: config.hop_size,
            filterbank,
            dct,
        }
    }

    /// Sample rate the extractor expects its input in (Hz).
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Dimensionality of every vector this extractor produces.
    pub fn dimension(&self) -> usize {
        self.num_coefficients
    }

    /// Extract the mean-MFCC fingerprint of `samples`.
    ///
    /// Returns exactly [`dimension`](Self::dimension) coefficients for any
    /// valid clip, regardless of its duration.
    ///
    /// # Errors
    ///
    /// [`ExtractionError::Empty`], [`ExtractionError::TooShort`] or
    /// [`ExtractionError::Silent`] for degenerate input; no partial vector
    /// is ever produced.
    pub fn extract(&self, samples: &[f32]) -> Result<Vec<f32>, ExtractionError> {
        if samples.is_empty() {
            return Err(ExtractionError::Empty);
        }
        if samples.len() < self.fft_size {
            return Err(ExtractionError::TooShort {
                min: self.fft_size,
                got: samples.len(),
            });
        }

        let peak = samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max);
        if peak < SILENCE_FLOOR {
            return Err(ExtractionError::Silent { amplitude: peak });
        }

        // (bins × frames) → (bands × frames) → log → (coeffs × frames)
        let spectrogram = power_spectrogram(samples, self.fft_size, self.hop_size);
        let mel = self.filterbank.dot(&spectrogram);
        let log_mel = mel.mapv(|x| (x + LOG_GUARD).ln());
        let mfcc = self.dct.dot(&log_mel);

        // Mean over the time axis collapses to one scalar per coefficient.
        let mean = mfcc.mean_axis(Axis(1)).ok_or(ExtractionError::Degenerate)?;

        let vector: Vec<f32> = mean.to_vec();
        if vector.iter().any(|v| !v.is_finite()) {
            return Err(ExtractionError::Degenerate);
        }

        debug_assert_eq!(vector.len(), self.num_coefficients);
        Ok(vector)
    }
}

/// Orthonormal DCT-II basis, shape `(num_coefficients, num_bands)`.
fn dct_basis(num_coefficients: usize, num_bands: usize) -> Array2<f32> {
    let m = num_bands as f32;
    let mut basis = Array2::<f32>::zeros((num_coefficients, num_bands));

    for k in 0..num_coefficients {
        let scale = if k == 0 {
            (1.0 / m).sqrt()
        } else {
            (2.0 / m).sqrt()
        };
        for n in 0..num_bands {
            let angle = std::f32::consts::PI * k as f32 * (2.0 * n as f32 + 1.0) / (2.0 * m);
            basis[[k, n]] = scale * angle.cos();
        }
    }

    basis
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
