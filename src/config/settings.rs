//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Settings for audio capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Pipeline sample rate in Hz. Every captured clip is resampled to this
    /// rate before feature extraction (must stay fixed once profiles exist —
    /// MFCC vectors from different rates are not comparable).
    pub sample_rate: u32,
    /// Recording duration in seconds used when the caller does not supply
    /// one (or supplies something non-numeric).
    pub default_duration_secs: f32,
    /// Minimum accepted recording length in seconds.
    pub min_recording_secs: f32,
    /// Maximum accepted recording length in seconds.
    pub max_recording_secs: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            default_duration_secs: 3.0,
            min_recording_secs: 0.5,
            max_recording_secs: 30.0,
        }
    }
}

// ---------------------------------------------------------------------------
// FeatureConfig
// ---------------------------------------------------------------------------

/// Settings for the MFCC feature extractor.
///
/// `num_coefficients` fixes the dimensionality of every feature vector the
/// system ever stores or queries; changing it invalidates all persisted
/// profiles and the trained model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Number of cepstral coefficients per feature vector.
    pub num_coefficients: usize,
    /// Number of triangular mel filterbank bands.
    pub num_mel_bands: usize,
    /// FFT window length in samples.
    pub fft_size: usize,
    /// Hop between successive analysis frames in samples.
    pub hop_size: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            num_coefficients: 13,
            num_mel_bands: 40,
            fft_size: 1024,
            hop_size: 256,
        }
    }
}

// ---------------------------------------------------------------------------
// ClassifierConfig
// ---------------------------------------------------------------------------

/// Hyperparameters for the feed-forward classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Hidden layer widths, first to last.
    pub hidden_layers: Vec<usize>,
    /// Iteration cap for the training loop.
    pub max_iter: usize,
    /// Gradient-descent step size.
    pub learning_rate: f64,
    /// Momentum coefficient.
    pub momentum: f64,
    /// Training stops early once the loss improves by less than this
    /// between iterations.
    pub tolerance: f64,
    /// Seed for weight initialisation, so retraining on the same profiles
    /// yields the same model.
    pub seed: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            hidden_layers: vec![128, 64],
            max_iter: 500,
            learning_rate: 0.1,
            momentum: 0.9,
            tolerance: 1e-6,
            seed: 7,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use voiceprint::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Audio capture settings.
    pub audio: AudioConfig,
    /// MFCC extraction settings.
    pub feature: FeatureConfig,
    /// Classifier hyperparameters.
    pub classifier: ClassifierConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Interpret an optional recording-duration argument.
    ///
    /// Non-numeric or absent input falls back to
    /// `audio.default_duration_secs` rather than being rejected — the
    /// duration field is a convenience, not a validated input.
    pub fn duration_or_default(&self, input: Option<&str>) -> f32 {
        input
            .and_then(|s| s.trim().parse::<f32>().ok())
            .unwrap_or(self.audio.default_duration_secs)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` survives a TOML round trip.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.audio.sample_rate, loaded.audio.sample_rate);
        assert_eq!(
            original.audio.default_duration_secs,
            loaded.audio.default_duration_secs
        );
        assert_eq!(
            original.feature.num_coefficients,
            loaded.feature.num_coefficients
        );
        assert_eq!(original.feature.num_mel_bands, loaded.feature.num_mel_bands);
        assert_eq!(original.classifier.hidden_layers, loaded.classifier.hidden_layers);
        assert_eq!(original.classifier.max_iter, loaded.classifier.max_iter);
        assert_eq!(original.classifier.seed, loaded.classifier.seed);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.audio.sample_rate, default.audio.sample_rate);
        assert_eq!(
            config.feature.num_coefficients,
            default.feature.num_coefficients
        );
        assert_eq!(config.classifier.hidden_layers, default.classifier.hidden_layers);
    }

    /// Pin the shipped defaults; changing these invalidates persisted state.
    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.audio.sample_rate, 16_000);
        assert_eq!(cfg.audio.default_duration_secs, 3.0);
        assert_eq!(cfg.feature.num_coefficients, 13);
        assert_eq!(cfg.classifier.hidden_layers, vec![128, 64]);
        assert_eq!(cfg.classifier.max_iter, 500);
    }

    // ---- duration_or_default ---

    #[test]
    fn numeric_duration_is_parsed() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.duration_or_default(Some("5")), 5.0);
        assert_eq!(cfg.duration_or_default(Some("2.5")), 2.5);
        assert_eq!(cfg.duration_or_default(Some(" 4 ")), 4.0);
    }

    #[test]
    fn non_numeric_duration_falls_back_to_default() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.duration_or_default(Some("abc")), 3.0);
        assert_eq!(cfg.duration_or_default(Some("")), 3.0);
        assert_eq!(cfg.duration_or_default(None), 3.0);
    }
}
