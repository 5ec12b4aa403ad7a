//! Durable key/value store configuration.

use serde::{Deserialize, Serialize};

/// Key/value store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store provider: `"memory"` or `"file"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Path of the JSON file used by the `file` provider.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            path: default_path(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_path() -> String {
    "data/qap-store.json".to_string()
}
