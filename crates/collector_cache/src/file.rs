//! JSON file store for processes that start, answer one query and exit.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CacheError;
use crate::store::CacheStore;

#[derive(Serialize, Deserialize)]
struct FileEntry {
    value: Value,
    /// Unix time in milliseconds.
    stored_at: i64,
}

/// A [`CacheStore`] kept in memory and mirrored to a JSON file on every write.
///
/// Entries survive process restarts, so `hard_refresh` and `bypass_cache`
/// mean the same thing for a one-shot CLI as for a long-running service.
pub struct FileCache {
    path: PathBuf,
    ttl: Option<Duration>,
    entries: Mutex<HashMap<String, FileEntry>>,
}

impl FileCache {
    /// Load `path`, dropping expired entries. A missing or unreadable file
    /// starts an empty cache.
    pub fn open(path: impl Into<PathBuf>, ttl: Option<Duration>) -> Self {
        let path = path.into();
        let mut entries = Self::load(&path);
        let now = now_millis();
        entries.retain(|_, entry| !is_expired(ttl, entry, now));
        debug!(path = %path.display(), entries = entries.len(), "cache file opened");

        Self {
            path,
            ttl,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn load(path: &Path) -> HashMap<String, FileEntry> {
        if !path.exists() {
            return HashMap::new();
        }
        match std::fs::read_to_string(path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                warn!(path = %path.display(), "Corrupt cache file, starting empty: {e}");
                HashMap::new()
            }),
            Err(e) => {
                warn!(path = %path.display(), "Cannot read cache file, starting empty: {e}");
                HashMap::new()
            }
        }
    }

    /// Write the whole map to a sibling temp file, then rename over `path`.
    fn persist(&self, entries: &HashMap<String, FileEntry>) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn is_expired(ttl: Option<Duration>, entry: &FileEntry, now: i64) -> bool {
    ttl.is_some_and(|ttl| {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        now.saturating_sub(entry.stored_at) >= ttl_ms
    })
}

#[async_trait]
impl CacheStore for FileCache {
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if is_expired(self.ttl, entry, now_millis()) => {
                entries.remove(key);
                self.persist(&entries)?;
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), CacheError> {
        let mut entries = self.entries.lock();
        let now = now_millis();
        entries.retain(|_, entry| !is_expired(self.ttl, entry, now));
        entries.insert(
            key.to_string(),
            FileEntry {
                value,
                stored_at: now,
            },
        );
        self.persist(&entries)
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock();
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");

        let first = FileCache::open(&path, None);
        first.set("btc.value[\"1A1z\"]{}", json!(2.5)).await.unwrap();
        drop(first);

        let second = FileCache::open(&path, None);
        assert_eq!(
            second.get("btc.value[\"1A1z\"]{}").await.unwrap(),
            Some(json!(2.5))
        );
    }

    #[tokio::test]
    async fn expired_entries_are_dropped_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        FileCache::open(&path, None).set("k", json!(1)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let reopened = FileCache::open(&path, Some(Duration::from_millis(5)));
        assert!(reopened.is_empty());
        assert!(reopened.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn writes_drop_expired_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::open(dir.path().join("cache.json"), Some(Duration::from_millis(5)));
        cache.set("old", json!(1)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        cache.set("new", json!(2)).await.unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{ not json").unwrap();

        let cache = FileCache::open(&path, None);
        assert!(cache.is_empty());
        cache.set("k", json!("v")).await.unwrap();
        assert_eq!(FileCache::open(&path, None).len(), 1);
    }

    #[tokio::test]
    async fn remove_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let cache = FileCache::open(&path, None);
        cache.set("a", json!(1)).await.unwrap();
        cache.remove("a").await.unwrap();

        assert!(FileCache::open(&path, None).is_empty());
    }

    #[tokio::test]
    async fn unwritable_location_reports_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        let cache = FileCache::open(blocker.join("cache.json"), None);
        assert!(cache.set("k", json!(1)).await.is_err());
    }
}
