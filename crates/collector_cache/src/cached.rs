//! The caching wrapper around fetch operations.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::key::CacheKey;
use crate::store::CacheStore;

/// Per-call cache control. Never forwarded to the wrapped operation.
///
/// When both flags are set, `bypass_cache` wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheControl {
    /// Run the operation live; neither read nor write the cache.
    pub bypass_cache: bool,
    /// Run the operation and overwrite the cache entry; never read it.
    pub hard_refresh: bool,
}

impl CacheControl {
    /// Read through the cache, filling it on a miss.
    pub const NORMAL: Self = Self {
        bypass_cache: false,
        hard_refresh: false,
    };

    pub const fn bypass() -> Self {
        Self {
            bypass_cache: true,
            hard_refresh: false,
        }
    }

    pub const fn hard_refresh() -> Self {
        Self {
            bypass_cache: false,
            hard_refresh: true,
        }
    }
}

/// Memoizes operation results in a shared [`CacheStore`].
///
/// Cloning is cheap; clones share the store.
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn CacheStore>,
}

impl ResultCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// The store this cache reads and writes.
    pub fn store(&self) -> Arc<dyn CacheStore> {
        Arc::clone(&self.store)
    }

    /// Run `op` through the cache under `key`.
    ///
    /// Errors from `op` are returned unchanged and never cached. Store failures
    /// never reach the caller: a failed read counts as a miss and a failed write
    /// is logged and dropped.
    pub async fn call<T, E, F, Fut>(
        &self,
        key: &CacheKey,
        control: CacheControl,
        op: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned + Send,
        E: Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, E>> + Send,
    {
        if control.bypass_cache || !key.is_cacheable() {
            debug!(key = %key, "cache bypassed");
            return op().await;
        }

        let rendered = key.render();

        if control.hard_refresh {
            let result = op().await?;
            self.write(&rendered, &result).await;
            debug!(key = %rendered, "cache hard refresh");
            return Ok(result);
        }

        if let Some(hit) = self.read::<T>(&rendered).await {
            return Ok(hit);
        }

        info!(key = %rendered, "cache miss, fetching");
        let result = op().await?;
        self.write(&rendered, &result).await;
        Ok(result)
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let stored = match self.store.get(key).await {
            Ok(stored) => stored?,
            Err(e) => {
                warn!(key = %key, "cache read failed, treating as miss: {e}");
                return None;
            }
        };
        match serde_json::from_value(stored) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %key, "cached value has unexpected shape, treating as miss: {e}");
                None
            }
        }
    }

    async fn write<T: Serialize>(&self, key: &str, result: &T) {
        let value: Value = match serde_json::to_value(result) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, "result not cacheable: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set(key, value).await {
            warn!(key = %key, "cache write failed: {e}");
        }
    }
}
