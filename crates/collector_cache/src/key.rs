//! Deterministic cache keys.

use std::fmt;

use serde::Serialize;
use tracing::warn;

/// Key under which a call's result is stored.
///
/// Built from the operation identity, the positional arguments and the keyword
/// arguments, each serialized as JSON. The rendered key has all whitespace
/// removed, so arguments that differ only in embedded whitespace share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    identity: String,
    positional: String,
    keyword: String,
    cacheable: bool,
}

impl CacheKey {
    /// Start a key for the operation named `identity`, with no arguments.
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            positional: "[]".into(),
            keyword: "{}".into(),
            cacheable: true,
        }
    }

    /// Set the positional arguments. Pass a tuple or slice.
    pub fn positional<A: Serialize + ?Sized>(mut self, args: &A) -> Self {
        match serde_json::to_string(args) {
            Ok(rendered) => self.positional = rendered,
            Err(e) => self.mark_uncacheable(&e),
        }
        self
    }

    /// Set the keyword arguments. Pass a struct or map.
    pub fn keyword<K: Serialize + ?Sized>(mut self, kwargs: &K) -> Self {
        match serde_json::to_string(kwargs) {
            Ok(rendered) => self.keyword = rendered,
            Err(e) => self.mark_uncacheable(&e),
        }
        self
    }

    /// Whether every argument serialized. Calls with an uncacheable key always
    /// run live.
    pub fn is_cacheable(&self) -> bool {
        self.cacheable
    }

    /// The normalized key string handed to the store.
    pub fn render(&self) -> String {
        self.identity
            .chars()
            .chain(self.positional.chars())
            .chain(self.keyword.chars())
            .filter(|c| !c.is_whitespace())
            .collect()
    }

    fn mark_uncacheable(&mut self, err: &serde_json::Error) {
        warn!(identity = %self.identity, "cache key arguments did not serialize: {err}");
        self.cacheable = false;
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
