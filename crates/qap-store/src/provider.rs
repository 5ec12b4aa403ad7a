//! Store manager that dispatches to the configured backend.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use qap_core::config::store::StoreConfig;
use qap_core::error::AppError;
use qap_core::result::AppResult;
use qap_core::traits::store::KeyValueStore;

/// Store manager that wraps the configured key/value backend.
///
/// The backend is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// The inner backend.
    inner: Arc<dyn KeyValueStore>,
}

impl StoreManager {
    /// Create a new store manager from configuration.
    pub async fn new(config: &StoreConfig) -> AppResult<Self> {
        let inner: Arc<dyn KeyValueStore> = match config.provider.as_str() {
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory store");
                Arc::new(crate::memory::MemoryStore::new())
            }
            #[cfg(feature = "file")]
            "file" => {
                info!(path = %config.path, "Initializing file store");
                Arc::new(crate::file::FileStore::open(&config.path).await?)
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: memory, file"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a store manager from an existing backend (for testing).
    pub fn from_store(store: Arc<dyn KeyValueStore>) -> Self {
        Self { inner: store }
    }

    /// Create a store manager over a fresh in-memory backend.
    #[cfg(feature = "memory")]
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(crate::memory::MemoryStore::new()))
    }

    /// Get a reference to the inner backend.
    pub fn backend(&self) -> &dyn KeyValueStore {
        self.inner.as_ref()
    }

    /// Read and decode a JSON value.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        match self.inner.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Encode and write a JSON value.
    pub async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        let raw = serde_json::to_string(value)?;
        self.inner.set(key, &raw).await
    }

    /// Decode every value under `prefix`, ordered by key.
    pub async fn scan_json<T: DeserializeOwned>(&self, prefix: &str) -> AppResult<Vec<T>> {
        self.inner
            .scan_prefix(prefix)
            .await?
            .into_iter()
            .map(|(_, raw)| serde_json::from_str(&raw).map_err(AppError::from))
            .collect()
    }
}

#[async_trait]
impl KeyValueStore for StoreManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.inner.exists(key).await
    }

    async fn scan_prefix(&self, prefix: &str) -> AppResult<Vec<(String, String)>> {
        self.inner.scan_prefix(prefix).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }

    async fn flush_all(&self) -> AppResult<()> {
        self.inner.flush_all().await
    }
}
