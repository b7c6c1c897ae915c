//! Result caching for slow, rate-limited upstream lookups.
//!
//! Any fetch operation can be routed through [`ResultCache::call`]. Calls with
//! the same [`CacheKey`] are answered from the injected [`CacheStore`] until the
//! entry is evicted or overwritten. A [`CacheControl`] value passed next to the
//! operation can force a live fetch (`bypass_cache`) or a fetch-and-store
//! without a read (`hard_refresh`).
//!
//! [`MemoryCache`] serves long-running processes; [`FileCache`] keeps entries
//! across runs of a one-shot command.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use collector_cache::{CacheControl, CacheKey, MemoryCache, ResultCache};
//!
//! # async fn example() -> Result<(), std::io::Error> {
//! let cache = ResultCache::new(Arc::new(MemoryCache::new(None)));
//! let key = CacheKey::new("btc.value").positional(&("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa",));
//! let balance: f64 = cache
//!     .call(&key, CacheControl::default(), || async { Ok::<_, std::io::Error>(2.5) })
//!     .await?;
//! # let _ = balance;
//! # Ok(())
//! # }
//! ```

pub mod cached;
pub mod error;
pub mod file;
pub mod key;
pub mod store;

pub use cached::{CacheControl, ResultCache};
pub use error::CacheError;
pub use file::FileCache;
pub use key::CacheKey;
pub use store::{CacheStore, MemoryCache};
