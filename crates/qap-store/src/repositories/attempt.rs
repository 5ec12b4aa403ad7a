//! Failed-login bookkeeping, keyed by normalized email.

use std::sync::Arc;

use qap_core::result::AppResult;
use qap_core::traits::store::KeyValueStore;
use qap_entity::auth::LoginAttempt;

use crate::keys;
use crate::provider::StoreManager;

/// Repository for [`LoginAttempt`] records.
#[derive(Debug, Clone)]
pub struct LoginAttemptRepository {
    store: Arc<StoreManager>,
}

impl LoginAttemptRepository {
    /// Create a new login attempt repository.
    pub fn new(store: Arc<StoreManager>) -> Self {
        Self { store }
    }

    /// Find the record for an email.
    pub async fn find(&self, email: &str) -> AppResult<Option<LoginAttempt>> {
        self.store.get_json(&keys::login_attempt(email)).await
    }

    /// Find the record for an email or start a fresh one.
    pub async fn find_or_new(&self, email: &str) -> AppResult<LoginAttempt> {
        Ok(self
            .find(email)
            .await?
            .unwrap_or_else(|| LoginAttempt::new(email)))
    }

    /// Persist a record.
    pub async fn save(&self, attempt: &LoginAttempt) -> AppResult<()> {
        self.store
            .set_json(&keys::login_attempt(&attempt.email), attempt)
            .await
    }

    /// Drop the record for an email.
    pub async fn clear(&self, email: &str) -> AppResult<()> {
        self.store.delete(&keys::login_attempt(email)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_or_new_then_save() {
        let repo = LoginAttemptRepository::new(Arc::new(StoreManager::in_memory()));
        let mut attempt = repo.find_or_new("x@y.com").await.unwrap();
        assert_eq!(attempt.attempts, 0);
        attempt.attempts = 3;
        repo.save(&attempt).await.unwrap();
        assert_eq!(repo.find("x@y.com").await.unwrap().unwrap().attempts, 3);
        repo.clear("x@y.com").await.unwrap();
        assert!(repo.find("x@y.com").await.unwrap().is_none());
    }
}
