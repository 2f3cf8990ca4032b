//! Atomic JSON persistence helpers shared by the profile store and the
//! classifier manager.
//!
//! Both persisted blobs (`profiles.json`, `model.json`) are whole-state
//! overwrites, so each write goes to a sibling temp file first and is then
//! renamed over the target. A crash mid-write leaves either the old file or
//! the new one, never a truncated mix.

use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// PersistenceError
// ---------------------------------------------------------------------------

/// Errors raised while reading or writing a persisted blob.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but the deserializer cannot make sense of it.
    /// Treated as fatal at startup — a corrupt blob is reported, not
    /// silently replaced with an empty state.
    #[error("corrupt data in {path}: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A persisted feature vector does not match the configured
    /// dimensionality. Detected at load time so the failure surfaces
    /// before the vector is ever used.
    #[error("profile '{name}' has {got} coefficients, expected {expected}")]
    CorruptVector {
        name: String,
        expected: usize,
        got: usize,
    },
}

fn io_err(path: &Path, source: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        path: path.display().to_string(),
        source,
    }
}

// ---------------------------------------------------------------------------
// read_json / write_json_atomic
// ---------------------------------------------------------------------------

/// Read and deserialize a JSON blob.
///
/// Returns `Ok(None)` when the file does not exist — a missing blob means an
/// empty store / untrained model, not an error.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PersistenceError> {
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let value = serde_json::from_str(&data).map_err(|e| PersistenceError::Corrupt {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(Some(value))
}

/// Serialize `value` as pretty JSON and write it to `path` via a temp file
/// plus atomic rename, creating parent directories as needed.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(path, e))?;
    }

    let data = serde_json::to_string_pretty(value).map_err(|e| PersistenceError::Corrupt {
        path: path.display().to_string(),
        source: e,
    })?;

    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, data).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| io_err(path, e))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
