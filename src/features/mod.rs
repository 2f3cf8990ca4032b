//! Feature extraction — PCM waveform → fixed-length acoustic fingerprint.
//!
//! # Quick start
//!
//! ```rust
//! use voiceprint::config::FeatureConfig;
//! use voiceprint::features::MfccExtractor;
//!
//! let extractor = MfccExtractor::new(&FeatureConfig::default(), 16_000);
//!
//! // 1 s of a 440 Hz tone
//! let audio: Vec<f32> = (0..16_000)
//!     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 16_000.0).sin())
//!     .collect();
//!
//! let fingerprint = extractor.extract(&audio).unwrap();
//! assert_eq!(fingerprint.len(), 13);
//! ```

pub mod mel;
pub mod mfcc;

pub use mfcc::{ExtractionError, MfccExtractor};
