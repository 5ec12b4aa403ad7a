//! Session slot repository.
//!
//! Exactly one slot exists; a login overwrites whatever occupied it.
//! Callers store the token digest, never the bearer token.

use std::sync::Arc;

use qap_core::result::AppResult;
use qap_core::traits::store::KeyValueStore;
use qap_entity::session::Session;

use crate::keys;
use crate::provider::StoreManager;

/// Repository for the single persisted session.
#[derive(Debug, Clone)]
pub struct SessionSlotRepository {
    store: Arc<StoreManager>,
}

impl SessionSlotRepository {
    /// Create a new session slot repository.
    pub fn new(store: Arc<StoreManager>) -> Self {
        Self { store }
    }

    /// Read the session occupying the slot, if any.
    pub async fn load(&self) -> AppResult<Option<Session>> {
        self.store.get_json(&keys::session_slot()).await
    }

    /// Write a session into the slot, replacing any previous one.
    pub async fn save(&self, session: &Session) -> AppResult<()> {
        self.store.set_json(&keys::session_slot(), session).await
    }

    /// Empty the slot. Clearing an empty slot is a no-op.
    pub async fn clear(&self) -> AppResult<()> {
        self.store.delete(&keys::session_slot()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use qap_entity::account::{Account, Role};

    fn session(token: &str) -> Session {
        let now = Utc::now();
        Session {
            token: token.to_string(),
            account: Account::new("Admin", "admin@qap.local", "111.111.111-11", Role::Admin, now),
            issued_at: now,
            expires_at: now + Duration::hours(8),
        }
    }

    #[tokio::test]
    async fn test_save_overwrites_slot() {
        let repo = SessionSlotRepository::new(Arc::new(StoreManager::in_memory()));
        repo.save(&session("first")).await.unwrap();
        repo.save(&session("second")).await.unwrap();
        assert_eq!(repo.load().await.unwrap().unwrap().token, "second");
        repo.clear().await.unwrap();
        repo.clear().await.unwrap();
        assert!(repo.load().await.unwrap().is_none());
    }
}
