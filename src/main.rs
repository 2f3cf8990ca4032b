//! Application entry point — voiceprint CLI.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Load the profile store and classifier model (missing files ⇒ empty
//!    store / untrained model).
//! 4. Open the capture device.
//! 5. Run the requested operation through the [`Orchestrator`].
//!
//! # Usage
//!
//! ```text
//! voiceprint enroll <name> [seconds]   record and register a voice profile
//! voiceprint detect [seconds]          record and identify the speaker
//! voiceprint list                      show enrolled profiles
//! ```
//!
//! A non-numeric `[seconds]` argument silently falls back to the configured
//! default (3 s) — it is a convenience field, not a validated input.

use anyhow::{bail, Context, Result};

use voiceprint::{
    audio::{ClipValidator, CpalRecorder},
    classifier::ClassifierManager,
    config::{AppConfig, AppPaths},
    features::MfccExtractor,
    pipeline::{ConsolePresenter, Orchestrator},
    profile::ProfileStore,
};

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("voiceprint starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str);

    // 3. Persisted state — a corrupt blob is a fatal, reported condition.
    let paths = AppPaths::new();
    let store = ProfileStore::load_from(&paths.profiles_file, config.feature.num_coefficients)
        .context("loading voice profiles")?;
    let classifier = ClassifierManager::load_from(&paths.model_file, config.classifier.clone())
        .context("loading classifier model")?;

    // `list` needs no capture device.
    if command == Some("list") {
        let names = store.names();
        if names.is_empty() {
            println!("no voices enrolled yet");
        } else {
            println!("enrolled voices ({}):", names.len());
            for name in &names {
                println!("  - {name}");
            }
        }
        return Ok(());
    }

    let extractor = MfccExtractor::new(&config.feature, config.audio.sample_rate);
    let validator = ClipValidator::from_config(&config.audio);
    let mut presenter = ConsolePresenter;

    match command {
        Some("enroll") => {
            let Some(name) = args.get(1) else {
                bail!("usage: voiceprint enroll <name> [seconds]");
            };
            let duration = config.duration_or_default(args.get(2).map(String::as_str));

            // 4. Capture device (only opened when an operation records)
            let recorder = CpalRecorder::new(config.audio.sample_rate)
                .context("opening capture device")?;
            let mut orchestrator =
                Orchestrator::new(store, classifier, extractor, validator, Box::new(recorder));

            // 5. Run. Failures were already shown via the presenter.
            if orchestrator.enroll(name, duration, &mut presenter).is_err() {
                std::process::exit(1);
            }
        }

        Some("detect") => {
            let duration = config.duration_or_default(args.get(1).map(String::as_str));

            let recorder = CpalRecorder::new(config.audio.sample_rate)
                .context("opening capture device")?;
            let mut orchestrator =
                Orchestrator::new(store, classifier, extractor, validator, Box::new(recorder));

            if orchestrator.detect(duration, &mut presenter).is_err() {
                std::process::exit(1);
            }
        }

        _ => {
            bail!(
                "usage: voiceprint <enroll|detect|list>\n  \
                 enroll <name> [seconds]   record and register a voice profile\n  \
                 detect [seconds]          record and identify the speaker\n  \
                 list                      show enrolled profiles"
            );
        }
    }

    Ok(())
}
