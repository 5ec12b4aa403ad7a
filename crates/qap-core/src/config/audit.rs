//! Audit log configuration.

use serde::{Deserialize, Serialize};

/// Audit log retention configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Maximum number of events retained; the oldest are dropped first.
    #[serde(default = "default_max_events")]
    pub max_events: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            max_events: default_max_events(),
        }
    }
}

fn default_max_events() -> usize {
    1000
}
