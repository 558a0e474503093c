use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_grace_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShutdownConfig {
    /// How long in-flight requests may run after a termination signal
    #[serde(default = "default_grace_secs")]
    pub grace_secs: u64,
}

impl ShutdownConfig {
    pub fn from_env<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let grace_secs = lookup("SHUTDOWN_GRACE_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_grace_secs);

        Self { grace_secs }
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_secs)
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace_secs: default_grace_secs(),
        }
    }
}
