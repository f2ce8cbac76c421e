use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing of the refresh scheduler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Seconds between discovery runs.
    pub refresh_interval_secs: u64,
    /// Upper bound on one discovery call, in seconds.
    pub discovery_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 120,
            discovery_timeout_secs: 30,
        }
    }
}

impl PoolConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_secs(self.discovery_timeout_secs)
    }
}
