//! Simulated network round trips.
//!
//! Authority operations pass through [`NetworkSimulator::round_trip`] so the
//! calling UI experiences realistic delay and the occasional transient
//! failure. Disabled simulators return immediately.

use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::config::SimulationConfig;
use crate::error::AppError;

/// Injects latency and transient failures according to [`SimulationConfig`].
#[derive(Debug, Clone)]
pub struct NetworkSimulator {
    config: SimulationConfig,
}

impl NetworkSimulator {
    /// Create a simulator from configuration.
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// A simulator that never delays or fails.
    pub fn disabled() -> Self {
        Self::new(SimulationConfig::default())
    }

    /// Whether this simulator injects anything.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Simulate one network round trip for `operation`.
    ///
    /// Returns a `Network` error when the injected failure fires.
    pub async fn round_trip(&self, operation: &str) -> Result<(), AppError> {
        if !self.config.enabled {
            return Ok(());
        }

        let (delay_ms, fail) = {
            let mut rng = rand::thread_rng();
            let low = self.config.latency_min_ms;
            let high = self.config.latency_max_ms.max(low);
            let delay = rng.gen_range(low..=high);
            let rate = self.config.failure_rate.clamp(0.0, 1.0);
            (delay, rng.gen_bool(rate))
        };

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;

        if fail {
            debug!(operation, delay_ms, "Injected network failure");
            return Err(AppError::network("Network error. Please try again."));
        }

        Ok(())
    }
}

impl Default for NetworkSimulator {
    fn default() -> Self {
        Self::disabled()
    }
}
