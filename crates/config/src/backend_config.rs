//! Backend access configuration section

use crate::validation::{Checks, ConfigSection, ValidationError};
use serde::{Deserialize, Serialize};

/// Retry and transaction limits for the document backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BackendConfig {
    /// Attempts for a single story read
    pub fetch_attempts: usize,

    /// Delay before the first retry; doubles after each attempt
    pub retry_initial_delay_ms: u64,

    /// Attempts for an optimistic stats transaction
    pub transaction_attempts: usize,

    /// How long to wait for the speech engine to come up
    pub init_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            fetch_attempts: 3,
            retry_initial_delay_ms: 100,
            transaction_attempts: 5,
            init_timeout_secs: 10,
        }
    }
}

impl BackendConfig {
    pub fn retry_initial_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.retry_initial_delay_ms)
    }

    pub fn init_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.init_timeout_secs)
    }
}

impl ConfigSection for BackendConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        Checks::new()
            .within("backend.fetch_attempts", self.fetch_attempts, 1..=10)
            .within("backend.retry_initial_delay_ms", self.retry_initial_delay_ms, 0..=60_000)
            .within("backend.transaction_attempts", self.transaction_attempts, 1..=25)
            .within("backend.init_timeout_secs", self.init_timeout_secs, 1..=300)
            .finish()
    }
}
