//! Key/value store trait for pluggable durable backends.

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for durable key/value backends (in-memory or file-backed).
///
/// All values are JSON strings. Unlike a cache, entries never expire on
/// their own; callers delete what they no longer need.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value, overwriting any previous one.
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Delete a key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a key exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Return every `(key, value)` pair whose key starts with `prefix`,
    /// ordered by key.
    async fn scan_prefix(&self, prefix: &str) -> AppResult<Vec<(String, String)>>;

    /// Check that the backend is usable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Remove all entries.
    async fn flush_all(&self) -> AppResult<()>;
}
