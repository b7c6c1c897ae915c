//! Cache store error types.

/// Errors a [`CacheStore`](crate::CacheStore) backend may report.
///
/// None of these ever reach the caller of [`ResultCache::call`](crate::ResultCache::call);
/// reads fail open and writes are logged and dropped.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The backend could not be reached or refused the request.
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),

    /// A file-backed store could not read or write its file.
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be converted to or from its stored form.
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
