use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::repository::{
    ProgressRecord, ProgressRepository, SessionHistoryRepository, SessionRecord, Storage,
    StorageError,
};

/// Fixed key for the progress blob, carried over from the original game's
/// localStorage layout.
pub const PROGRESS_KEY: &str = "sight-words-progress";
/// Fixed key for the session history log.
pub const SESSIONS_KEY: &str = "sight-words-sessions";

/// Durable key-value backend: one JSON document per key, stored as
/// `<root>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum JsonFileInitError {
    #[error("cannot create storage directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },
}

fn io_err(e: &io::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn ser_err<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

impl JsonFileStore {
    /// Open (creating if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns `JsonFileInitError` if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, JsonFileInitError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| JsonFileInitError::CreateDir {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    fn read_key<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, StorageError> {
        let path = self.key_path(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_err(&e)),
        };
        serde_json::from_str(&raw).map(Some).map_err(ser_err)
    }

    fn write_key<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let path = self.key_path(key);
        let raw = serde_json::to_string(value).map_err(ser_err)?;
        // Write to a sibling temp file and rename so a failed write cannot
        // truncate the previous blob.
        let tmp = self.root.join(format!("{key}.json.tmp"));
        fs::write(&tmp, raw).map_err(|e| io_err(&e))?;
        fs::rename(&tmp, &path).map_err(|e| io_err(&e))
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ProgressRepository for JsonFileStore {
    fn load(&self) -> Result<Option<ProgressRecord>, StorageError> {
        self.read_key(PROGRESS_KEY)
    }

    fn save(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        self.write_key(PROGRESS_KEY, record)
    }
}

impl SessionHistoryRepository for JsonFileStore {
    fn append(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let mut log: Vec<SessionRecord> = self.read_key(SESSIONS_KEY)?.unwrap_or_default();
        log.push(record.clone());
        self.write_key(SESSIONS_KEY, &log)
    }

    fn recent(&self, limit: usize) -> Result<Vec<SessionRecord>, StorageError> {
        let log: Vec<SessionRecord> = self.read_key(SESSIONS_KEY)?.unwrap_or_default();
        let skip = log.len().saturating_sub(limit);
        Ok(log[skip..].to_vec())
    }
}

impl Storage {
    /// Build a `Storage` backed by JSON files under `root`.
    ///
    /// # Errors
    ///
    /// Returns `JsonFileInitError` if the directory cannot be created.
    pub fn json_file(root: impl Into<PathBuf>) -> Result<Self, JsonFileInitError> {
        let store = JsonFileStore::open(root)?;
        let progress: Arc<dyn ProgressRepository> = Arc::new(store.clone());
        let sessions: Arc<dyn SessionHistoryRepository> = Arc::new(store);
        Ok(Self { progress, sessions })
    }
}
