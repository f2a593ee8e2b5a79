//! Recent-query history persisted to a key/value store.
//!
//! The history is a JSON array of strings stored under [`HISTORY_KEY`],
//! most recent first. Storage failures never reach the caller: reads fall
//! back to an empty history and writes are logged, so search keeps working
//! when the backing store is unavailable.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use tracing::warn;

/// Storage key for the serialized history.
pub const HISTORY_KEY: &str = "search-history";
/// Default number of remembered queries.
pub const DEFAULT_CAPACITY: usize = 10;
/// Queries of this many chars or fewer are not recorded.
pub const MIN_QUERY_CHARS: usize = 2;

/// String key/value persistence, shaped like browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Volatile [`KeyValueStore`] for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

/// Ordered, deduplicated, capped list of past queries.
pub struct HistoryStore<S: KeyValueStore> {
    storage: S,
    capacity: usize,
    entries: Vec<String>,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Load the persisted history from `storage`.
    pub fn open(storage: S, capacity: usize) -> Self {
        let entries = match storage.get(HISTORY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(mut list) => {
                    list.truncate(capacity);
                    list
                }
                Err(e) => {
                    warn!(error = %e, "ignoring malformed search history");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "search history unavailable");
                Vec::new()
            }
        };

        Self {
            storage,
            capacity,
            entries,
        }
    }

    /// Most recent first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a submitted query.
    ///
    /// Returns `false` when the query was too short to keep.
    pub fn record(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.chars().count() <= MIN_QUERY_CHARS {
            return false;
        }

        self.entries.retain(|q| q != query);
        self.entries.insert(0, query.to_string());
        self.entries.truncate(self.capacity);
        self.persist();
        true
    }

    /// Forget every entry, in memory and in storage.
    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = self.storage.remove(HISTORY_KEY) {
            warn!(error = %e, "failed to clear persisted search history");
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&self) {
        let raw = match serde_json::to_string(&self.entries) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "failed to serialize search history");
                return;
            }
        };
        if let Err(e) = self.storage.set(HISTORY_KEY, &raw) {
            warn!(error = %e, "failed to persist search history");
        }
    }
}
