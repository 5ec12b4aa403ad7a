//! Simulated network latency and failure injection configuration.

use serde::{Deserialize, Serialize};

/// Settings for the network simulator wrapped around authority operations.
///
/// Disabled by default. When enabled, every simulated round trip sleeps a
/// uniform random delay in `latency_min_ms..=latency_max_ms` and fails with
/// probability `failure_rate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Whether simulation is active.
    #[serde(default)]
    pub enabled: bool,
    /// Lower latency bound in milliseconds.
    #[serde(default = "default_latency_min")]
    pub latency_min_ms: u64,
    /// Upper latency bound in milliseconds.
    #[serde(default = "default_latency_max")]
    pub latency_max_ms: u64,
    /// Probability in `[0, 1]` that a round trip fails.
    #[serde(default = "default_failure_rate")]
    pub failure_rate: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            latency_min_ms: default_latency_min(),
            latency_max_ms: default_latency_max(),
            failure_rate: default_failure_rate(),
        }
    }
}

fn default_latency_min() -> u64 {
    250
}

fn default_latency_max() -> u64 {
    900
}

fn default_failure_rate() -> f64 {
    0.03
}
