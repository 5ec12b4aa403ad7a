//! Account repository implementation.
//!
//! Accounts are stored by ID with secondary indexes on normalized email
//! and national ID. Index maintenance runs under a single write lock so
//! uniqueness checks and writes cannot interleave.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use qap_core::error::AppError;
use qap_core::result::AppResult;
use qap_core::traits::store::KeyValueStore;
use qap_core::types::AccountId;
use qap_entity::account::{Account, Role};

use crate::keys;
use crate::provider::StoreManager;

/// Repository for account CRUD and lookup operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    store: Arc<StoreManager>,
    write_lock: Arc<Mutex<()>>,
}

impl AccountRepository {
    /// Create a new account repository.
    pub fn new(store: Arc<StoreManager>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Find an account by primary key.
    pub async fn find_by_id(&self, id: AccountId) -> AppResult<Option<Account>> {
        self.store.get_json(&keys::account_by_id(id)).await
    }

    /// Find an account by normalized email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        match self
            .store
            .get_json::<AccountId>(&keys::account_email_index(email))
            .await?
        {
            Some(id) => self.find_by_id(id).await,
            None => Ok(None),
        }
    }

    /// Find an account by national ID (punctuation is ignored).
    pub async fn find_by_national_id(&self, national_id: &str) -> AppResult<Option<Account>> {
        match self
            .store
            .get_json::<AccountId>(&keys::account_national_id_index(national_id))
            .await?
        {
            Some(id) => self.find_by_id(id).await,
            None => Ok(None),
        }
    }

    /// All accounts, oldest first.
    pub async fn find_all(&self) -> AppResult<Vec<Account>> {
        let mut accounts: Vec<Account> = self.store.scan_json(&keys::accounts_prefix()).await?;
        accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.name.cmp(&b.name)));
        Ok(accounts)
    }

    /// All accounts with the given role, oldest first.
    pub async fn find_by_role(&self, role: Role) -> AppResult<Vec<Account>> {
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .filter(|account| account.role == role)
            .collect())
    }

    /// Number of stored accounts.
    pub async fn count(&self) -> AppResult<usize> {
        Ok(self.store.scan_prefix(&keys::accounts_prefix()).await?.len())
    }

    /// Insert a new account. Fails with a conflict if the email or national
    /// ID is already taken.
    pub async fn create(&self, account: &Account) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        self.ensure_unique(account).await?;

        self.store
            .set_json(&keys::account_by_id(account.id), account)
            .await?;
        self.write_indexes(account).await?;
        debug!(account_id = %account.id, email = %account.email, "Account created");
        Ok(())
    }

    /// Replace an existing account, keeping the indexes in step.
    pub async fn update(&self, account: &Account) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let previous = self
            .find_by_id(account.id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Account {} not found", account.id)))?;
        self.ensure_unique(account).await?;

        if previous.email != account.email {
            self.store
                .delete(&keys::account_email_index(&previous.email))
                .await?;
        }
        if keys::account_national_id_index(&previous.national_id)
            != keys::account_national_id_index(&account.national_id)
        {
            self.store
                .delete(&keys::account_national_id_index(&previous.national_id))
                .await?;
        }

        self.store
            .set_json(&keys::account_by_id(account.id), account)
            .await?;
        self.write_indexes(account).await?;
        debug!(account_id = %account.id, "Account updated");
        Ok(())
    }

    /// Hard-delete an account and its indexes. Returns whether it existed.
    pub async fn delete(&self, id: AccountId) -> AppResult<bool> {
        let _guard = self.write_lock.lock().await;
        let Some(account) = self.find_by_id(id).await? else {
            return Ok(false);
        };

        self.store
            .delete(&keys::account_email_index(&account.email))
            .await?;
        self.store
            .delete(&keys::account_national_id_index(&account.national_id))
            .await?;
        self.store.delete(&keys::account_by_id(id)).await?;
        debug!(account_id = %id, "Account deleted");
        Ok(true)
    }

    async fn ensure_unique(&self, account: &Account) -> AppResult<()> {
        if let Some(existing) = self.find_by_email(&account.email).await? {
            if existing.id != account.id {
                return Err(AppError::conflict(format!(
                    "Email '{}' is already in use",
                    account.email
                )));
            }
        }
        if let Some(existing) = self.find_by_national_id(&account.national_id).await? {
            if existing.id != account.id {
                return Err(AppError::conflict(format!(
                    "National ID '{}' is already in use",
                    account.national_id
                )));
            }
        }
        Ok(())
    }

    async fn write_indexes(&self, account: &Account) -> AppResult<()> {
        self.store
            .set_json(&keys::account_email_index(&account.email), &account.id)
            .await?;
        self.store
            .set_json(&keys::account_national_id_index(&account.national_id), &account.id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use qap_core::error::ErrorKind;

    fn repo() -> AccountRepository {
        AccountRepository::new(Arc::new(StoreManager::in_memory()))
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let repo = repo();
        let account = Account::new("Ana", "Ana@PM.gov.br", "529.982.247-25", Role::Operative, Utc::now());
        repo.create(&account).await.unwrap();

        assert_eq!(repo.find_by_email("ana@pm.gov.br").await.unwrap().unwrap().id, account.id);
        assert_eq!(repo.find_by_national_id("52998224725").await.unwrap().unwrap().id, account.id);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_or_national_id_conflicts() {
        let repo = repo();
        let now = Utc::now();
        repo.create(&Account::new("A", "a@b.c", "111.111.111-11", Role::Admin, now))
            .await
            .unwrap();

        let same_email = Account::new("B", "A@B.C", "222.222.222-22", Role::Operative, now);
        assert_eq!(repo.create(&same_email).await.unwrap_err().kind, ErrorKind::Conflict);

        let same_nid = Account::new("C", "c@b.c", "11111111111", Role::Operative, now);
        assert_eq!(repo.create(&same_nid).await.unwrap_err().kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_update_moves_indexes() {
        let repo = repo();
        let mut account = Account::new("A", "old@b.c", "111.111.111-11", Role::Operative, Utc::now());
        repo.create(&account).await.unwrap();

        account.email = "new@b.c".to_string();
        repo.update(&account).await.unwrap();

        assert!(repo.find_by_email("old@b.c").await.unwrap().is_none());
        assert!(repo.find_by_email("new@b.c").await.unwrap().is_some());

        let reuse = Account::new("B", "old@b.c", "222.222.222-22", Role::Operative, Utc::now());
        repo.create(&reuse).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_and_find_all_order() {
        let repo = repo();
        let now = Utc::now();
        let first = Account::new("First", "f@b.c", "1", Role::Admin, now);
        let second = Account::new("Second", "s@b.c", "2", Role::Operative, now + Duration::seconds(1));
        repo.create(&second).await.unwrap();
        repo.create(&first).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all[0].id, first.id);
        assert_eq!(repo.find_by_role(Role::Operative).await.unwrap().len(), 1);

        assert!(repo.delete(first.id).await.unwrap());
        assert!(!repo.delete(first.id).await.unwrap());
        assert!(repo.find_by_email("f@b.c").await.unwrap().is_none());
    }
}
