//! Session lifetime configuration.

use serde::{Deserialize, Serialize};

/// Session lifetime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Absolute lifetime of a standard session in hours.
    #[serde(default = "default_ttl")]
    pub ttl_hours: u64,
    /// Absolute lifetime of a super-administrator session in hours.
    #[serde(default = "default_superadmin_ttl")]
    pub superadmin_ttl_hours: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl(),
            superadmin_ttl_hours: default_superadmin_ttl(),
        }
    }
}

fn default_ttl() -> u64 {
    8
}

fn default_superadmin_ttl() -> u64 {
    4
}
