//! File-backed key/value store standing in for browser local storage.
//!
//! The whole store is one JSON object of string values. Every write
//! rewrites the file through a temp file + rename so a crash never leaves
//! half a document behind. A file that no longer parses is reported on
//! read and replaced by the next write.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

use folio_core::history::KeyValueStore;

pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_raw(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(raw))
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match self.read_raw()? {
            Some(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("Malformed storage file: {}", self.path.display())),
            None => Ok(BTreeMap::new()),
        }
    }

    /// Entries to build the next write on. A malformed file is discarded;
    /// the flag tells the caller the file needs rewriting.
    fn read_for_write(&self) -> Result<(BTreeMap<String, String>, bool)> {
        let Some(raw) = self.read_raw()? else {
            return Ok((BTreeMap::new(), false));
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok((entries, false)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "replacing malformed storage file");
                Ok((BTreeMap::new(), true))
            }
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(entries)?)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let (mut entries, _) = self.read_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let (mut entries, malformed) = self.read_for_write()?;
        if entries.remove(key).is_some() || malformed {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::history::{HistoryStore, HISTORY_KEY};

    #[test]
    fn test_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested/local-storage.json"));
        assert_eq!(storage.get("k").unwrap(), None);
        storage.set("k", "v").unwrap();
        storage.set("other", "x").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
        storage.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);
        assert_eq!(storage.get("other").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_history_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local-storage.json");

        let mut history = HistoryStore::open(FileStorage::new(&path), 10);
        history.record("React");
        history.record("TypeScript");

        let reopened = HistoryStore::open(FileStorage::new(&path), 10);
        assert_eq!(
            reopened.entries(),
            ["TypeScript".to_string(), "React".to_string()]
        );

        let raw = std::fs::read_to_string(&path).unwrap();
        let map: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(map[HISTORY_KEY], r#"["TypeScript","React"]"#);
    }

    #[test]
    fn test_corrupt_file_degrades_history_then_recovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local-storage.json");
        std::fs::write(&path, "not json at all").unwrap();

        let mut history = HistoryStore::open(FileStorage::new(&path), 10);
        assert!(history.is_empty());
        assert!(history.record("rust"));
        history.clear();
        assert!(history.record("react"));
        assert_eq!(history.entries(), ["react".to_string()]);

        let reopened = HistoryStore::open(FileStorage::new(&path), 10);
        assert_eq!(reopened.entries(), ["react".to_string()]);
    }

    #[test]
    fn test_remove_repairs_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local-storage.json");
        std::fs::write(&path, "{ truncated").unwrap();

        let storage = FileStorage::new(&path);
        assert!(storage.get(HISTORY_KEY).is_err());
        storage.remove(HISTORY_KEY).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let map: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert!(map.is_empty());
        assert_eq!(storage.get(HISTORY_KEY).unwrap(), None);
    }
}
