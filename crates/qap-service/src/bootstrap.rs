//! Reference accounts seeded into an empty store.

use tracing::info;

use chrono::{DateTime, Utc};

use qap_auth::PasswordHasher;
use qap_core::error::AppError;
use qap_entity::account::{Account, Role};
use qap_store::repositories::{AccountRepository, CredentialRepository};

/// A seeded account and its initial password.
#[derive(Debug, Clone, Copy)]
pub struct SeedAccount {
    /// Display name.
    pub name: &'static str,
    /// Email.
    pub email: &'static str,
    /// CPF.
    pub national_id: &'static str,
    /// Role.
    pub role: Role,
    /// Whether the account starts active.
    pub active: bool,
    /// Initial password.
    pub password: &'static str,
}

/// The reference accounts: one administrator and three operatives, one of
/// them deactivated. All have completed first access.
pub const SEED_ACCOUNTS: [SeedAccount; 4] = [
    SeedAccount {
        name: "Admin Principal",
        email: "admin@qap.local",
        national_id: "111.111.111-11",
        role: Role::Admin,
        active: true,
        password: "Admin!123",
    },
    SeedAccount {
        name: "Sgt. Carlos Silva",
        email: "carlos.silva@pm.gov.br",
        national_id: "222.222.222-22",
        role: Role::Operative,
        active: true,
        password: "Policial123!",
    },
    SeedAccount {
        name: "Cb. Ana Paula Costa",
        email: "ana.costa@pm.gov.br",
        national_id: "333.333.333-33",
        role: Role::Operative,
        active: true,
        password: "Policial123!",
    },
    SeedAccount {
        name: "Sd. João Santos",
        email: "joao.santos@pm.gov.br",
        national_id: "444.444.444-44",
        role: Role::Operative,
        active: false,
        password: "Policial123!",
    },
];

/// Seed the reference accounts if no account exists yet.
///
/// Returns how many accounts were created (0 when the store already had
/// accounts).
pub async fn seed_if_empty(
    accounts: &AccountRepository,
    credentials: &CredentialRepository,
    hasher: &PasswordHasher,
    now: DateTime<Utc>,
) -> Result<usize, AppError> {
    if accounts.count().await? > 0 {
        return Ok(0);
    }

    for seed in &SEED_ACCOUNTS {
        let mut account = Account::new(seed.name, seed.email, seed.national_id, seed.role, now);
        account.active = seed.active;
        account.email_confirmed = true;

        accounts.create(&account).await?;
        let hash = hasher.hash_password(seed.password)?;
        credentials.set_hash(&account.email, &hash).await?;
    }

    info!(count = SEED_ACCOUNTS.len(), "Seeded reference accounts");
    Ok(SEED_ACCOUNTS.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use qap_core::config::auth::HashingConfig;
    use qap_store::StoreManager;

    fn light_hasher() -> PasswordHasher {
        PasswordHasher::new(&HashingConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_seeds_only_empty_store() {
        let store = Arc::new(StoreManager::in_memory());
        let accounts = AccountRepository::new(store.clone());
        let credentials = CredentialRepository::new(store);
        let hasher = light_hasher();
        let now = Utc::now();

        assert_eq!(seed_if_empty(&accounts, &credentials, &hasher, now).await.unwrap(), 4);
        assert_eq!(seed_if_empty(&accounts, &credentials, &hasher, now).await.unwrap(), 0);
        assert_eq!(accounts.count().await.unwrap(), 4);

        let admin = accounts.find_by_email("admin@qap.local").await.unwrap().unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(admin.email_confirmed);
        let hash = credentials.find_hash("admin@qap.local").await.unwrap().unwrap();
        assert!(hasher.verify_password("Admin!123", &hash).unwrap());

        let joao = accounts.find_by_email("joao.santos@pm.gov.br").await.unwrap().unwrap();
        assert!(!joao.active);
    }
}
