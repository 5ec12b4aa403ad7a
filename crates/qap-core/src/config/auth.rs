//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication, credential and lockout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret accepted by the super-administrator login path.
    #[serde(default = "default_superadmin_key")]
    pub superadmin_key: String,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Characters that satisfy the "symbol" password rule.
    #[serde(default = "default_password_symbols")]
    pub password_symbols: String,
    /// Consecutive failed login attempts before lockout.
    #[serde(default = "default_max_failed")]
    pub max_failed_attempts: u32,
    /// Lockout window in minutes.
    #[serde(default = "default_lockout")]
    pub lockout_duration_minutes: u64,
    /// Optional lifetime of first-access tokens. Unset means tokens never expire.
    #[serde(default)]
    pub verification_token_ttl_minutes: Option<u64>,
    /// First-access delivery channel: `"outbox"` keeps tokens in the store
    /// for the delivery process, `"log"` only records that one was issued.
    #[serde(default = "default_mailer")]
    pub mailer: String,
    /// Argon2 hashing cost parameters.
    #[serde(default)]
    pub hashing: HashingConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            superadmin_key: default_superadmin_key(),
            password_min_length: default_password_min(),
            password_symbols: default_password_symbols(),
            max_failed_attempts: default_max_failed(),
            lockout_duration_minutes: default_lockout(),
            verification_token_ttl_minutes: None,
            mailer: default_mailer(),
            hashing: HashingConfig::default(),
        }
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashingConfig {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    /// Number of iterations.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Degree of parallelism.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

fn default_superadmin_key() -> String {
    "QAP-SUPER-KEY-0001".to_string()
}

fn default_password_min() -> usize {
    8
}

fn default_password_symbols() -> String {
    "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~".to_string()
}

fn default_max_failed() -> u32 {
    5
}

fn default_lockout() -> u64 {
    5
}

fn default_mailer() -> String {
    "outbox".to_string()
}

fn default_memory_kib() -> u32 {
    19 * 1024
}

fn default_iterations() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}
