//! File-backed key/value storage.
//!
//! The reload-surviving backend for the session store: a small JSON object
//! on disk, read once at open and rewritten on every mutation. The session
//! holds two keys, so rewriting the whole map is the simple and correct
//! choice here.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::Context;
use tracing::warn;

use auth_flow::{KeyValueStorage, StorageError};

/// Durable [`KeyValueStorage`] over a JSON file.
pub struct FileStorage {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStorage {
    /// Open the storage, reading existing entries if the file exists.
    ///
    /// A corrupt file is treated like an absent one (with a warning): the
    /// session fails safe to "not signed in" rather than refusing to start.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "session file corrupt; starting empty");
                    HashMap::new()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(err) => {
                return Err(StorageError::Backend(anyhow::Error::new(err).context(
                    format!("reading session file {}", path.display()),
                )))
            }
        };
        Ok(Self { path, entries })
    }

    fn flush(&self) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(&self.entries)
            .context("serializing session entries")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("writing session file {}", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
