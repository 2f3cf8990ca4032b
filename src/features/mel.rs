//! Spectral front end — Hann window, STFT power spectrogram, mel filterbank.
//!
//! Everything here is parametric over the FFT size, hop and band count so
//! the extractor can be reconfigured from `settings.toml` without touching
//! the math.

use ndarray::Array2;
use rustfft::{num_complex::Complex, FftPlanner};
use std::f32::consts::PI;

/// Generate a Hann window of the given length.
pub fn hann_window(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| 0.5 - 0.5 * ((2.0 * PI * i as f32) / len as f32).cos())
        .collect()
}

/// Short-time Fourier transform returning the power spectrogram,
/// shape `(fft_size / 2 + 1, num_frames)`.
///
/// The signal is zero-padded by `fft_size / 2` on both sides (centered
/// frames), so even a clip barely longer than one window produces at least
/// one frame.
pub fn power_spectrogram(samples: &[f32], fft_size: usize, hop_size: usize) -> Array2<f32> {
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(fft_size);

    let window = hann_window(fft_size);

    let pad = fft_size / 2;
    let mut padded = vec![0.0f32; pad];
    padded.extend_from_slice(samples);
    padded.extend(std::iter::repeat(0.0).take(pad));

    let num_frames = (padded.len() - fft_size) / hop_size + 1;
    let freq_bins = fft_size / 2 + 1;
    let mut spectrogram = Array2::<f32>::zeros((freq_bins, num_frames));

    let mut frame: Vec<Complex<f32>> = vec![Complex::new(0.0, 0.0); fft_size];
    for frame_idx in 0..num_frames {
        let start = frame_idx * hop_size;
        for i in 0..fft_size {
            frame[i] = Complex::new(padded[start + i] * window[i], 0.0);
        }

        fft.process(&mut frame);
        for k in 0..freq_bins {
            let magnitude = frame[k].norm();
            spectrogram[[k, frame_idx]] = magnitude * magnitude;
        }
    }

    spectrogram
}

/// Convert Hz to the mel scale (Slaney formula — linear below 1 kHz,
/// logarithmic above).
pub fn hz_to_mel(hz: f64) -> f64 {
    let f_sp = 200.0 / 3.0;
    let min_log_hz = 1000.0;
    let min_log_mel = min_log_hz / f_sp;
    let logstep = (6.4f64).ln() / 27.0;

    if hz >= min_log_hz {
        min_log_mel + (hz / min_log_hz).ln() / logstep
    } else {
        hz / f_sp
    }
}

/// Convert mel back to Hz (inverse of [`hz_to_mel`]).
pub fn mel_to_hz(mel: f64) -> f64 {
    let f_sp = 200.0 / 3.0;
    let min_log_hz = 1000.0;
    let min_log_mel = min_log_hz / f_sp;
    let logstep = (6.4f64).ln() / 27.0;

    if mel >= min_log_mel {
        min_log_hz * (logstep * (mel - min_log_mel)).exp()
    } else {
        f_sp * mel
    }
}

/// Create a triangular mel filterbank, shape `(num_bands, fft_size / 2 + 1)`,
/// with Slaney area normalization.
pub fn mel_filterbank(
    sample_rate: u32,
    fft_size: usize,
    num_bands: usize,
    fmin: f64,
    fmax: f64,
) -> Array2<f32> {
    let freq_bins = fft_size / 2 + 1;
    let mut filterbank = Array2::<f32>::zeros((num_bands, freq_bins));

    let fft_freqs: Vec<f64> = (0..freq_bins)
        .map(|k| k as f64 * sample_rate as f64 / fft_size as f64)
        .collect();

    // num_bands + 2 edge frequencies, evenly spaced on the mel scale.
    let fmin_mel = hz_to_mel(fmin);
    let fmax_mel = hz_to_mel(fmax);
    let edges: Vec<f64> = (0..=num_bands + 1)
        .map(|i| {
            let mel = fmin_mel + (fmax_mel - fmin_mel) * i as f64 / (num_bands + 1) as f64;
            mel_to_hz(mel)
        })
        .collect();

    let widths: Vec<f64> = edges.windows(2).map(|w| w[1] - w[0]).collect();

    for b in 0..num_bands {
        for k in 0..freq_bins {
            let lower = (fft_freqs[k] - edges[b]) / widths[b];
            let upper = (edges[b + 2] - fft_freqs[k]) / widths[b + 1];
            filterbank[[b, k]] = 0.0f64.max(lower.min(upper)) as f32;
        }

        let enorm = 2.0 / (edges[b + 2] - edges[b]);
        for k in 0..freq_bins {
            filterbank[[b, k]] *= enorm as f32;
        }
    }

    filterbank
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hann_window_endpoints_and_peak() {
        let w = hann_window(64);
        assert!(w[0].abs() < 1e-6);
        // Peak near the middle is close to 1.
        assert!(w[32] > 0.99);
        assert!(w.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn mel_scale_round_trips() {
        for hz in [50.0, 300.0, 1000.0, 4000.0, 7999.0] {
            let back = mel_to_hz(hz_to_mel(hz));
            assert!((back - hz).abs() < 1e-6, "{hz} -> {back}");
        }
    }

    #[test]
    fn mel_scale_is_monotonic() {
        let mut prev = hz_to_mel(0.0);
        for hz in (100..8000).step_by(100) {
            let mel = hz_to_mel(hz as f64);
            assert!(mel > prev);
            prev = mel;
        }
    }

    #[test]
    fn spectrogram_shape_matches_input_length() {
        let samples = vec![0.1_f32; 4096];
        let spec = power_spectrogram(&samples, 1024, 256);
        assert_eq!(spec.shape()[0], 513); // 1024 / 2 + 1 bins
        assert_eq!(spec.shape()[1], 4096 / 256 + 1); // centered frames
    }

    /// A pure sine concentrates energy in the bin nearest its frequency.
    #[test]
    fn sine_energy_lands_in_the_right_bin() {
        let sr = 16_000.0_f32;
        let freq = 1000.0_f32;
        let samples: Vec<f32> = (0..8192)
            .map(|i| (2.0 * PI * freq * i as f32 / sr).sin())
            .collect();

        let spec = power_spectrogram(&samples, 1024, 256);
        // Sum energy per bin over all frames.
        let mid_frame = spec.shape()[1] / 2;
        let column = spec.column(mid_frame);
        let peak_bin = column
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();

        let expected_bin = (freq / sr * 1024.0).round() as usize;
        assert!(
            (peak_bin as i64 - expected_bin as i64).abs() <= 1,
            "peak at bin {peak_bin}, expected near {expected_bin}"
        );
    }

    #[test]
    fn filterbank_shape_and_coverage() {
        let fb = mel_filterbank(16_000, 1024, 40, 0.0, 8000.0);
        assert_eq!(fb.shape(), &[40, 513]);

        // Every band has some nonzero weight.
        for b in 0..40 {
            let row_sum: f32 = fb.row(b).sum();
            assert!(row_sum > 0.0, "band {b} is empty");
        }

        // No negative weights anywhere.
        assert!(fb.iter().all(|&v| v >= 0.0));
    }
}
