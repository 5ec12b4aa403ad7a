//! Credential repository: password hashes keyed by normalized email.

use std::sync::Arc;

use qap_core::result::AppResult;
use qap_core::traits::store::KeyValueStore;

use crate::keys;
use crate::provider::StoreManager;

/// Repository for password hashes. Plaintext never reaches this layer.
#[derive(Debug, Clone)]
pub struct CredentialRepository {
    store: Arc<StoreManager>,
}

impl CredentialRepository {
    /// Create a new credential repository.
    pub fn new(store: Arc<StoreManager>) -> Self {
        Self { store }
    }

    /// Fetch the stored hash for an email.
    pub async fn find_hash(&self, email: &str) -> AppResult<Option<String>> {
        self.store.get_json(&keys::credential(email)).await
    }

    /// Store (or replace) the hash for an email.
    pub async fn set_hash(&self, email: &str, hash: &str) -> AppResult<()> {
        self.store.set_json(&keys::credential(email), hash).await
    }

    /// Whether a credential exists for an email.
    pub async fn exists(&self, email: &str) -> AppResult<bool> {
        self.store.exists(&keys::credential(email)).await
    }

    /// Remove the credential for an email.
    pub async fn delete(&self, email: &str) -> AppResult<()> {
        self.store.delete(&keys::credential(email)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_replace_delete() {
        let repo = CredentialRepository::new(Arc::new(StoreManager::in_memory()));
        assert_eq!(repo.find_hash("a@b.c").await.unwrap(), None);
        repo.set_hash("a@b.c", "h1").await.unwrap();
        repo.set_hash("a@b.c", "h2").await.unwrap();
        assert_eq!(repo.find_hash("a@b.c").await.unwrap().as_deref(), Some("h2"));
        repo.delete("a@b.c").await.unwrap();
        assert!(!repo.exists("a@b.c").await.unwrap());
    }
}
