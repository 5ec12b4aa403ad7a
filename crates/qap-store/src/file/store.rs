//! JSON-file key/value store.
//!
//! The whole map is kept in memory and rewritten to disk on every
//! mutation (write to a sibling temp file, then rename). The in-memory map
//! only changes once the write succeeded.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use qap_core::error::{AppError, ErrorKind};
use qap_core::result::AppResult;
use qap_core::traits::store::KeyValueStore;

/// File-backed store that survives process restarts.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: Arc<RwLock<BTreeMap<String, String>>>,
}

impl FileStore {
    /// Open the store at `path`, loading existing contents if the file exists.
    pub async fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::with_source(
                    ErrorKind::Store,
                    format!("Store file '{}' is corrupt", path.display()),
                    e,
                )
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), entries = entries.len(), "Opened file store");

        Ok(Self {
            path,
            entries: Arc::new(RwLock::new(entries)),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), "Persisted file store");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.entries.read().await.contains_key(key))
    }

    async fn scan_prefix(&self, prefix: &str) -> AppResult<Vec<(String, String)>> {
        let entries = self.entries.read().await;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn flush_all(&self) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        let next = BTreeMap::new();
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_contents_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = FileStore::open(&path).await.unwrap();
        store.set("qap:session", "{\"token\":\"abc\"}").await.unwrap();
        store.set("qap:other", "1").await.unwrap();
        store.delete("qap:other").await.unwrap();
        drop(store);

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get("qap:session").await.unwrap().as_deref(),
            Some("{\"token\":\"abc\"}")
        );
        assert!(!reopened.exists("qap:other").await.unwrap());
    }

    #[tokio::test]
    async fn test_scan_prefix_uses_ordering() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("s.json")).await.unwrap();
        store.set("a:1", "x").await.unwrap();
        store.set("b:1", "y").await.unwrap();
        store.set("b:2", "z").await.unwrap();
        let found = store.scan_prefix("b:").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].0, "b:1");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        tokio::fs::write(&path, b"not json").await.unwrap();
        let err = FileStore::open(&path).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Store);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("sub");
        let store = FileStore::open(parent.join("store.json")).await.unwrap();
        store.set("kept", "1").await.unwrap();

        // A regular file where the directory should be makes every write fail.
        tokio::fs::remove_dir_all(&parent).await.unwrap();
        tokio::fs::write(&parent, b"blocker").await.unwrap();

        assert!(store.set("added", "2").await.is_err());
        assert!(!store.exists("added").await.unwrap());

        assert!(store.delete("kept").await.is_err());
        assert_eq!(store.get("kept").await.unwrap().as_deref(), Some("1"));

        assert!(store.flush_all().await.is_err());
        assert!(store.exists("kept").await.unwrap());
    }
}
