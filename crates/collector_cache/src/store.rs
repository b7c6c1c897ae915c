//! Cache store backends.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::CacheError;

/// Key-value backend behind a [`ResultCache`](crate::ResultCache).
///
/// Implementations may be shared process-wide (or fleet-wide, for a networked
/// store). No locking is required of them beyond what keeps a single `get` or
/// `set` consistent: concurrent writers of one key are last-write-wins.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch the value stored under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Value) -> Result<(), CacheError>;

    /// Drop the entry under `key`, if any.
    async fn remove(&self, key: &str) -> Result<(), CacheError>;
}

/// Once a store holds this many entries, each write also drops expired ones.
pub(crate) const PURGE_THRESHOLD: usize = 64;

struct Entry {
    value: Value,
    stored_at: Instant,
}

/// In-process store with an optional time-to-live.
///
/// With `ttl = None` entries live until overwritten, removed or cleared.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
    ttl: Option<Duration>,
}

impl MemoryCache {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Number of entries held. Expired entries count until the next read of
    /// their key or the next purge.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    fn is_expired(&self, entry: &Entry) -> bool {
        self.ttl
            .is_some_and(|ttl| entry.stored_at.elapsed() >= ttl)
    }

    /// Drop every expired entry.
    pub fn purge_expired(&self) {
        if self.ttl.is_none() {
            return;
        }
        self.entries.lock().retain(|_, entry| !self.is_expired(entry));
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if self.is_expired(entry) => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), CacheError> {
        let mut entries = self.entries.lock();
        if self.ttl.is_some() && entries.len() >= PURGE_THRESHOLD {
            entries.retain(|_, entry| !self.is_expired(entry));
        }
        entries.insert(
            key.to_string(),
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}
