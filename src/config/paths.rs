//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\voiceprint\
//!   macOS:   ~/Library/Application Support/voiceprint/
//!   Linux:   ~/.config/voiceprint/
//!
//! Data dir (enrolled profiles + trained model):
//!   Windows: %LOCALAPPDATA%\voiceprint\
//!   macOS:   ~/Library/Application Support/voiceprint/
//!   Linux:   ~/.local/share/voiceprint/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Full path to the enrolled-profile mapping (`profiles.json`).
    pub profiles_file: PathBuf,
    /// Full path to the trained classifier blob (`model.json`).
    pub model_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "voiceprint";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path (should be extremely rare in practice).
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let profiles_file = data_dir.join("profiles.json");
        let model_file = data_dir.join("model.json");

        Self {
            config_dir,
            settings_file,
            profiles_file,
            model_file,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
