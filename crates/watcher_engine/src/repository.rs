//! Key/value seam under the watch-state store.
//!
//! Each persisted entry is an independent JSON text value.
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    Favorites,
    Snapshots,
    LastCheck,
    SchemaVersion,
}

impl StateKey {
    pub fn as_str(self) -> &'static str {
        match self {
            StateKey::Favorites => "lm_favorite_users",
            StateKey::Snapshots => "lm_puzzle_data",
            StateKey::LastCheck => "lm_last_check",
            StateKey::SchemaVersion => "lm_schema_version",
        }
    }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("failed to read {key}: {source}")]
    Read {
        key: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {key}: {source}")]
    Write {
        key: &'static str,
        #[source]
        source: PersistError,
    },
}

pub trait StateRepository: Send + Sync {
    fn load(&self, key: StateKey) -> Result<Option<String>, RepositoryError>;
    fn save(&self, key: StateKey, value: &str) -> Result<(), RepositoryError>;
}

/// Process-local repository for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    entries: Mutex<HashMap<StateKey, String>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateRepository for MemoryRepository {
    fn load(&self, key: StateKey) -> Result<Option<String>, RepositoryError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(&key).cloned())
    }

    fn save(&self, key: StateKey, value: &str) -> Result<(), RepositoryError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per entry inside a state directory.
#[derive(Debug, Clone)]
pub struct JsonDirRepository {
    writer: AtomicFileWriter,
}

impl JsonDirRepository {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
        }
    }

    fn filename(key: StateKey) -> String {
        format!("{}.json", key.as_str())
    }
}

impl StateRepository for JsonDirRepository {
    fn load(&self, key: StateKey) -> Result<Option<String>, RepositoryError> {
        let path = self.writer.dir().join(Self::filename(key));
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(RepositoryError::Read {
                key: key.as_str(),
                source,
            }),
        }
    }

    fn save(&self, key: StateKey, value: &str) -> Result<(), RepositoryError> {
        self.writer
            .write(&Self::filename(key), value)
            .map(|_| ())
            .map_err(|source| RepositoryError::Write {
                key: key.as_str(),
                source,
            })
    }
}
