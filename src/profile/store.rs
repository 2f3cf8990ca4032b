//! Enrolled voice profiles with JSON persistence.
//!
//! [`ProfileStore`] maps speaker names to their feature vectors. The mapping
//! is persisted to `profiles.json` after every successful mutation, before
//! `put` returns, so the on-disk state never lags the in-memory one. There
//! is no unregister operation; re-enrolling a name overwrites its vector.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::persist::{read_json, write_json_atomic, PersistenceError};

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Reasons a profile cannot be stored.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("speaker name must not be empty")]
    EmptyName,

    /// The vector does not match the configured coefficient count. Only the
    /// extractor may produce vectors, so hitting this means a wiring bug.
    #[error("feature vector has {got} coefficients, expected {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

// ---------------------------------------------------------------------------
// ProfileStore
// ---------------------------------------------------------------------------

/// Mapping from speaker name to feature vector, persisted as JSON.
///
/// Backed by a `BTreeMap`, so iteration is name-ascending for free — the
/// order used both for display and for assembling training data.
#[derive(Debug)]
pub struct ProfileStore {
    profiles: BTreeMap<String, Vec<f32>>,
    dimension: usize,
    path: PathBuf,
}

impl ProfileStore {
    /// Load the store from `path`, validating every persisted vector against
    /// `dimension`.
    ///
    /// A missing file yields an empty store. A corrupt file or a vector of
    /// the wrong length is an error — bad persisted state must surface at
    /// startup, not at first use.
    pub fn load_from(path: &Path, dimension: usize) -> Result<Self, PersistenceError> {
        let profiles: BTreeMap<String, Vec<f32>> = read_json(path)?.unwrap_or_default();

        for (name, vector) in &profiles {
            if vector.len() != dimension {
                return Err(PersistenceError::CorruptVector {
                    name: name.clone(),
                    expected: dimension,
                    got: vector.len(),
                });
            }
        }

        log::info!("loaded {} voice profile(s)", profiles.len());

        Ok(Self {
            profiles,
            dimension,
            path: path.to_path_buf(),
        })
    }

    /// Insert or overwrite the profile for `name`, persisting the full
    /// mapping before returning.
    ///
    /// # Errors
    ///
    /// [`StoreError::EmptyName`] or [`StoreError::DimensionMismatch`] for
    /// invalid input (nothing is stored), [`StoreError::Persistence`] when
    /// the write fails (the in-memory mapping is rolled back so memory and
    /// disk stay consistent).
    pub fn put(&mut self, name: &str, vector: Vec<f32>) -> Result<(), StoreError> {
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if vector.len() != self.dimension {
            return Err(StoreError::DimensionMismatch {
                expected: self.dimension,
                got: vector.len(),
            });
        }

        let previous = self.profiles.insert(name.to_string(), vector);

        if let Err(e) = write_json_atomic(&self.path, &self.profiles) {
            // Roll back so a failed write leaves no phantom profile.
            match previous {
                Some(old) => {
                    self.profiles.insert(name.to_string(), old);
                }
                None => {
                    self.profiles.remove(name);
                }
            }
            return Err(e.into());
        }

        log::debug!("stored profile '{name}' ({} total)", self.profiles.len());
        Ok(())
    }

    /// All profiles as `(name, vector)` pairs, sorted by name ascending.
    pub fn all(&self) -> Vec<(String, Vec<f32>)> {
        self.profiles
            .iter()
            .map(|(n, v)| (n.clone(), v.clone()))
            .collect()
    }

    /// Enrolled speaker names, sorted ascending.
    pub fn names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    /// Number of enrolled profiles.
    pub fn count(&self) -> usize {
        self.profiles.len()
    }

    /// Configured feature-vector dimensionality.
    pub fn dimension(&self) -> usize {
        self.dimension
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

    fn store_in_temp() -> (ProfileStore, tempfile::TempDir) {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("profiles.json");
        let store = ProfileStore::load_from(&path, DIM).expect("load");
        (store, dir)
    }

    fn vec_of(value: f32) -> Vec<f32> {
        vec![value; DIM]
    }

    #[test]
    fn starts_empty() {
        let (store, _dir) = store_in_temp();
        assert_eq!(store.count(), 0);
        assert!(store.all().is_empty());
    }

    #[test]
    fn put_then_all_contains_the_profile() {
        let (mut store, _dir) = store_in_temp();
        store.put("alice", vec_of(1.0)).expect("put");

        let all = store.all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].0, "alice");
        assert_eq!(all[0].1, vec_of(1.0));
    }

    /// Re-registering the same name overwrites — last write wins.
    #[test]
    fn put_same_name_overwrites() {
        let (mut store, _dir) = store_in_temp();
        store.put("alice", vec_of(1.0)).expect("put 1");
        store.put("alice", vec_of(2.0)).expect("put 2");

        assert_eq!(store.count(), 1);
        assert_eq!(store.all()[0].1, vec_of(2.0));
    }

    #[test]
    fn distinct_names_accumulate() {
        let (mut store, _dir) = store_in_temp();
        for i in 0..5 {
            store.put(&format!("speaker{i}"), vec_of(i as f32)).expect("put");
        }
        assert_eq!(store.count(), 5);
    }

    #[test]
    fn all_is_sorted_by_name() {
        let (mut store, _dir) = store_in_temp();
        store.put("charlie", vec_of(3.0)).expect("put");
        store.put("alice", vec_of(1.0)).expect("put");
        store.put("bob", vec_of(2.0)).expect("put");

        let names: Vec<String> = store.all().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["alice", "bob", "charlie"]);
        assert_eq!(store.names(), vec!["alice", "bob", "charlie"]);
    }

    #[test]
    fn empty_name_is_rejected() {
        let (mut store, _dir) = store_in_temp();
        let err = store.put("", vec_of(1.0)).unwrap_err();
        assert!(matches!(err, StoreError::EmptyName));
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn wrong_dimension_is_rejected() {
        let (mut store, _dir) = store_in_temp();
        let err = store.put("alice", vec![1.0; DIM + 1]).unwrap_err();
        assert!(matches!(
            err,
            StoreError::DimensionMismatch {
                expected: DIM,
                got: 14
            }
        ));
        assert_eq!(store.count(), 0);
    }

    /// Every put persists: a reloaded store sees the same mapping.
    #[test]
    fn persists_and_reloads() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("profiles.json");

        {
            let mut store = ProfileStore::load_from(&path, DIM).expect("load");
            store.put("alice", vec_of(1.0)).expect("put");
            store.put("bob", vec_of(2.0)).expect("put");
        }

        let reloaded = ProfileStore::load_from(&path, DIM).expect("reload");
        assert_eq!(reloaded.count(), 2);
        assert_eq!(reloaded.all(), vec![
            ("alice".to_string(), vec_of(1.0)),
            ("bob".to_string(), vec_of(2.0)),
        ]);
    }

    /// A persisted vector of the wrong length fails at load time.
    #[test]
    fn corrupt_vector_fails_on_load() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("profiles.json");

        let mut bad = BTreeMap::new();
        bad.insert("alice".to_string(), vec![1.0f32; 5]); // wrong length
        write_json_atomic(&path, &bad).expect("write");

        let err = ProfileStore::load_from(&path, DIM).unwrap_err();
        assert!(matches!(err, PersistenceError::CorruptVector { .. }), "{err}");
    }

    #[test]
    fn unreadable_file_fails_on_load() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("profiles.json");
        std::fs::write(&path, "not json at all").expect("write");

        let err = ProfileStore::load_from(&path, DIM).unwrap_err();
        assert!(matches!(err, PersistenceError::Corrupt { .. }), "{err}");
    }
}
