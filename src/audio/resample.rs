//! Channel downmix and sample-rate conversion.
//!
//! The feature extractor expects **mono `f32`** audio at the configured
//! pipeline rate (16 kHz by default). Capture devices rarely deliver that
//! natively, so every clip passes through [`downmix_to_mono`] and then
//! [`resample`] before it leaves the audio module.
//!
//! The resampler is a plain linear interpolator. For a mean-pooled MFCC
//! fingerprint the interpolation error is far below the inter-speaker
//! variance, so a band-limited sinc resampler would buy nothing here.

/// Mix interleaved multi-channel audio down to mono by averaging the
/// channels of each frame.
///
/// The output length is `samples.len() / channels`. `channels == 1` returns
/// the input unchanged (as an owned `Vec`); `channels == 0` returns an empty
/// vector.
///
/// # Example
///
/// ```rust
/// use voiceprint::audio::downmix_to_mono;
///
/// let stereo = vec![0.5_f32, -0.5, 0.2, -0.2]; // L R L R
/// let mono = downmix_to_mono(&stereo, 2);
/// assert_eq!(mono.len(), 2);
/// assert!(mono[0].abs() < 1e-6);
/// ```
pub fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

/// Resample mono audio from `source_rate` Hz to `target_rate` Hz using
/// linear interpolation.
///
/// Matching rates and empty input are no-op fast paths. The output length is
/// approximately `samples.len() * target_rate / source_rate`.
pub fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if samples.is_empty() || source_rate == target_rate {
        return samples.to_vec();
    }

    let ratio = source_rate as f64 / target_rate as f64;
    let out_len = ((samples.len() as f64) / ratio).floor() as usize;
    let mut out = Vec::with_capacity(out_len);

    for i in 0..out_len {
        let pos = i as f64 * ratio;
        let idx = pos as usize;
        let frac = (pos - idx as f64) as f32;

        let a = samples[idx];
        let b = if idx + 1 < samples.len() {
            samples[idx + 1]
        } else {
            a
        };
        out.push(a + (b - a) * frac);
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
