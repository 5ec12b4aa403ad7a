//! Pending first-access tokens, addressed by the digest of the raw token.

use std::sync::Arc;

use qap_core::result::AppResult;
use qap_core::traits::store::KeyValueStore;
use qap_entity::auth::VerificationToken;

use crate::keys;
use crate::provider::StoreManager;

/// Repository for [`VerificationToken`] records.
///
/// Callers pass the token digest; the raw token is never stored.
#[derive(Debug, Clone)]
pub struct VerificationTokenRepository {
    store: Arc<StoreManager>,
}

impl VerificationTokenRepository {
    /// Create a new verification token repository.
    pub fn new(store: Arc<StoreManager>) -> Self {
        Self { store }
    }

    /// Store a pending token record.
    pub async fn insert(&self, digest: &str, record: &VerificationToken) -> AppResult<()> {
        self.store.set_json(&keys::verification(digest), record).await
    }

    /// Look up a pending token record.
    pub async fn find(&self, digest: &str) -> AppResult<Option<VerificationToken>> {
        self.store.get_json(&keys::verification(digest)).await
    }

    /// Consume a token record.
    pub async fn remove(&self, digest: &str) -> AppResult<()> {
        self.store.delete(&keys::verification(digest)).await
    }

    /// Drop every pending token issued for `email`. Returns how many were removed.
    pub async fn remove_for_email(&self, email: &str) -> AppResult<u64> {
        let prefix = keys::verification_prefix();
        let mut removed = 0;
        for (key, raw) in self.store.scan_prefix(&prefix).await? {
            let record: VerificationToken = serde_json::from_str(&raw)?;
            if record.email == email {
                self.store.delete(&key).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
