//! Classifier lifecycle — load, retrain, predict, persist.
//!
//! [`ClassifierManager`] owns the optional trained [`MlpModel`] and guards
//! its two preconditions: retraining needs at least two distinct speaker
//! names, and prediction needs a trained model. Every successful retrain is
//! persisted before the in-memory model is swapped, so the on-disk and
//! in-memory models never diverge.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::classifier::mlp::MlpModel;
use crate::config::ClassifierConfig;
use crate::persist::{read_json, write_json_atomic, PersistenceError};

// ---------------------------------------------------------------------------
// ClassifierError
// ---------------------------------------------------------------------------

/// Errors from the classifier subsystem.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Fewer than two distinct speakers available where two are required.
    #[error("at least two enrolled voices are required (have {have})")]
    InsufficientData { have: usize },

    /// Prediction attempted before any valid training.
    #[error("no trained model yet — enroll at least two voices first")]
    ModelNotReady,

    /// The query vector does not match the trained input dimensionality.
    #[error("query vector has {got} coefficients, model expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

// ---------------------------------------------------------------------------
// ClassifierManager
// ---------------------------------------------------------------------------

/// Owns the trainable multi-class classifier and its persistence.
#[derive(Debug)]
pub struct ClassifierManager {
    model: Option<MlpModel>,
    config: ClassifierConfig,
    path: PathBuf,
}

impl ClassifierManager {
    /// Load a previously persisted model from `path`, or start untrained
    /// when the file does not exist.
    ///
    /// A file that exists but cannot be deserialized is an error — a
    /// corrupt model blob must be reported, not silently discarded.
    pub fn load_from(path: &Path, config: ClassifierConfig) -> Result<Self, PersistenceError> {
        let model: Option<MlpModel> = read_json(path)?;
        match &model {
            Some(m) => log::info!(
                "loaded trained model ({} classes: {:?})",
                m.num_classes(),
                m.labels()
            ),
            None => log::info!("no persisted model — classifier starts untrained"),
        }

        Ok(Self {
            model,
            config,
            path: path.to_path_buf(),
        })
    }

    /// Retrain from scratch on the full current profile set and persist the
    /// result.
    ///
    /// # Errors
    ///
    /// [`ClassifierError::InsufficientData`] when `profiles` holds fewer
    /// than two distinct names, [`ClassifierError::Persistence`] when the
    /// new model cannot be written. In both cases any previously trained
    /// model is left untouched, in memory and on disk.
    pub fn retrain(&mut self, profiles: &[(String, Vec<f32>)]) -> Result<(), ClassifierError> {
        let distinct: BTreeSet<&str> = profiles.iter().map(|(n, _)| n.as_str()).collect();
        if distinct.len() < 2 {
            return Err(ClassifierError::InsufficientData {
                have: distinct.len(),
            });
        }

        let model = MlpModel::fit(profiles, &self.config);
        write_json_atomic(&self.path, &model)?;

        log::info!("classifier retrained on {} profile(s)", profiles.len());
        self.model = Some(model);
        Ok(())
    }

    /// Predict the speaker name for a single feature vector.
    ///
    /// The result is a point estimate: the best-matching class label, with
    /// no confidence attached.
    pub fn predict(&self, vector: &[f32]) -> Result<String, ClassifierError> {
        let model = self.model.as_ref().ok_or(ClassifierError::ModelNotReady)?;

        if vector.len() != model.input_dim() {
            return Err(ClassifierError::DimensionMismatch {
                expected: model.input_dim(),
                got: vector.len(),
            });
        }

        Ok(model.predict(vector).to_string())
    }

    /// `true` once a model trained on ≥2 classes is held.
    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const DIM: usize = 13;

    fn profile(name: &str, seed: f32) -> (String, Vec<f32>) {
        let mut v = vec![0.0f32; DIM];
        v[0] = seed * 10.0;
        v[3] = -seed * 2.0;
        (name.to_string(), v)
    }

    fn manager_in_temp() -> (ClassifierManager, tempfile::TempDir) {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("model.json");
        let mgr =
            ClassifierManager::load_from(&path, ClassifierConfig::default()).expect("load");
        (mgr, dir)
    }

    #[test]
    fn starts_untrained_when_no_file() {
        let (mgr, _dir) = manager_in_temp();
        assert!(!mgr.is_ready());
    }

    #[test]
    fn predict_before_training_is_model_not_ready() {
        let (mgr, _dir) = manager_in_temp();
        let err = mgr.predict(&vec![0.0; DIM]).unwrap_err();
        assert!(matches!(err, ClassifierError::ModelNotReady));
    }

    // ---- retrain preconditions ---

    #[test]
    fn retrain_with_no_profiles_is_insufficient() {
        let (mut mgr, _dir) = manager_in_temp();
        let err = mgr.retrain(&[]).unwrap_err();
        assert!(matches!(err, ClassifierError::InsufficientData { have: 0 }));
        assert!(!mgr.is_ready());
    }

    #[test]
    fn retrain_with_one_profile_is_insufficient() {
        let (mut mgr, _dir) = manager_in_temp();
        let err = mgr.retrain(&[profile("alice", 1.0)]).unwrap_err();
        assert!(matches!(err, ClassifierError::InsufficientData { have: 1 }));
    }

    /// Two entries sharing one name are still a single class.
    #[test]
    fn retrain_with_duplicate_names_is_insufficient() {
        let (mut mgr, _dir) = manager_in_temp();
        let err = mgr
            .retrain(&[profile("alice", 1.0), profile("alice", -1.0)])
            .unwrap_err();
        assert!(matches!(err, ClassifierError::InsufficientData { have: 1 }));
    }

    /// A failed retrain must leave a previously trained model untouched.
    #[test]
    fn failed_retrain_keeps_previous_model() {
        let (mut mgr, _dir) = manager_in_temp();
        let set = vec![profile("alice", 1.0), profile("bob", -1.0)];
        mgr.retrain(&set).expect("retrain");

        let err = mgr.retrain(&[profile("alice", 1.0)]).unwrap_err();
        assert!(matches!(err, ClassifierError::InsufficientData { .. }));

        // Old model still answers.
        assert_eq!(mgr.predict(&set[0].1).expect("predict"), "alice");
    }

    // ---- training + prediction ---

    #[test]
    fn retrain_then_predict_recalls_training_points() {
        let (mut mgr, _dir) = manager_in_temp();
        let set = vec![profile("alice", 1.0), profile("bob", -1.0)];
        mgr.retrain(&set).expect("retrain");

        assert!(mgr.is_ready());
        assert_eq!(mgr.predict(&set[0].1).expect("predict"), "alice");
        assert_eq!(mgr.predict(&set[1].1).expect("predict"), "bob");
    }

    #[test]
    fn predict_rejects_wrong_dimension() {
        let (mut mgr, _dir) = manager_in_temp();
        mgr.retrain(&[profile("alice", 1.0), profile("bob", -1.0)])
            .expect("retrain");

        let err = mgr.predict(&vec![0.0; DIM + 2]).unwrap_err();
        assert!(matches!(err, ClassifierError::DimensionMismatch { .. }));
    }

    // ---- persistence ---

    /// Persisting then reloading yields a manager that predicts identically.
    #[test]
    fn reloaded_model_predicts_identically() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("model.json");
        let set = vec![profile("alice", 1.0), profile("bob", -1.0)];

        {
            let mut mgr =
                ClassifierManager::load_from(&path, ClassifierConfig::default()).expect("load");
            mgr.retrain(&set).expect("retrain");
        }

        let reloaded =
            ClassifierManager::load_from(&path, ClassifierConfig::default()).expect("reload");
        assert!(reloaded.is_ready());
        assert_eq!(reloaded.predict(&set[0].1).expect("predict"), "alice");
        assert_eq!(reloaded.predict(&set[1].1).expect("predict"), "bob");
    }

    #[test]
    fn corrupt_model_blob_fails_on_load() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("model.json");
        std::fs::write(&path, "garbage").expect("write");

        let err = ClassifierManager::load_from(&path, ClassifierConfig::default()).unwrap_err();
        assert!(matches!(err, PersistenceError::Corrupt { .. }), "{err}");
    }
}
