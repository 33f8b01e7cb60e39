//! Cache store implementations.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by cache stores.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Malformed cached table: {0}")]
    Malformed(String),
}

/// A persisted route table and the time it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTable {
    /// Save time (seconds since epoch).
    pub saved_at: u64,
    /// Serialized `TableSnapshot`.
    pub table: serde_json::Value,
}

impl StoredTable {
    /// Wrap a serialized table, stamped with the current time.
    pub fn now(table: serde_json::Value) -> Self {
        Self {
            saved_at: unix_now(),
            table,
        }
    }

    /// Time elapsed since the table was saved.
    pub fn age(&self) -> Duration {
        Duration::from_secs(unix_now().saturating_sub(self.saved_at))
    }

    /// Check whether the table is still within the expiry window.
    pub fn is_fresh(&self, expire: Duration) -> bool {
        self.age() <= expire
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Load/save contract for compiled route tables.
pub trait CacheStore: Send + Sync + std::fmt::Debug {
    /// Returns the last saved table, or `None` if nothing was saved.
    fn load(&self) -> Result<Option<StoredTable>, CacheError>;

    /// Persist a table, replacing any previous one.
    fn save(&self, table: &StoredTable) -> Result<(), CacheError>;
}

/// Stores the table as a JSON file.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    path: PathBuf,
}

impl FileCacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CacheStore for FileCacheStore {
    fn load(&self) -> Result<Option<StoredTable>, CacheError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let reader = BufReader::new(File::open(&self.path)?);
        let stored: StoredTable = serde_json::from_reader(reader)?;
        tracing::debug!(path = ?self.path, saved_at = stored.saved_at, "Loaded route cache file");
        Ok(Some(stored))
    }

    fn save(&self, table: &StoredTable) -> Result<(), CacheError> {
        let writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer(writer, table)?;
        tracing::info!(path = ?self.path, "Saved route cache file");
        Ok(())
    }
}

/// Keeps the table in process memory.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    inner: Mutex<Option<StoredTable>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store, e.g. with an old snapshot.
    pub fn with_table(table: StoredTable) -> Self {
        Self {
            inner: Mutex::new(Some(table)),
        }
    }

    /// Current contents.
    pub fn get(&self) -> Option<StoredTable> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl CacheStore for MemoryCacheStore {
    fn load(&self) -> Result<Option<StoredTable>, CacheError> {
        Ok(self.get())
    }

    fn save(&self, table: &StoredTable) -> Result<(), CacheError> {
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(table.clone());
        Ok(())
    }
}
