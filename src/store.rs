use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Unix-epoch milliseconds.
pub type TimestampMs = i64;

/// Key under which the prompt keeps its shown history. Fixed so that every
/// embedding of the popup in the same profile shares one history.
pub const HISTORY_KEY: &str = "feedbackprompt";

/// Async key-value backend holding lists of shown timestamps.
///
/// `get` answers `Ok(None)` for a key that was never written; errors are
/// reserved for a backend that could not answer at all. What to do about an
/// unanswerable backend is the caller's policy, not the store's.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<TimestampMs>>>;
    async fn set(&self, key: &str, history: &[TimestampMs]) -> Result<()>;
}

/// In-process store for tests and throwaway profiles.
#[derive(Default)]
pub struct MemoryHistoryStore {
    entries: Mutex<HashMap<String, Vec<TimestampMs>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<TimestampMs>>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| Error::Store("history map poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, history: &[TimestampMs]) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::Store("history map poisoned".to_string()))?;
        entries.insert(key.to_string(), history.to_vec());
        Ok(())
    }
}

/// Durable store: one JSON object mapping keys to timestamp lists.
///
/// Writes land in a temp file first and are renamed into place, so a crash
/// mid-write never leaves a truncated history behind.
pub struct JsonFileHistoryStore {
    path: PathBuf,
}

impl JsonFileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_map(&self) -> Result<HashMap<String, Vec<TimestampMs>>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no history file yet, starting empty");
                return Ok(HashMap::new());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl HistoryStore for JsonFileHistoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<TimestampMs>>> {
        let mut map = self.read_map().await?;
        Ok(map.remove(key))
    }

    async fn set(&self, key: &str, history: &[TimestampMs]) -> Result<()> {
        // The write must land even when the existing file cannot be parsed;
        // an unreadable file is replaced, not propagated.
        let mut map = match self.read_map().await {
            Ok(map) => map,
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "unreadable history file, rewriting");
                HashMap::new()
            }
        };
        map.insert(key.to_string(), history.to_vec());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, serde_json::to_vec(&map)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
