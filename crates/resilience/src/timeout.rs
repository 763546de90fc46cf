// crates/resilience/src/timeout.rs
//! Timeout handling utilities

use crate::error::{ResilienceError, ResilienceResult};
use std::future::Future;
use std::time::Duration;

/// Awaits an operation, giving up once `duration` has elapsed
pub async fn with_timeout<F, T>(duration: Duration, operation: F) -> ResilienceResult<T>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(duration, operation)
        .await
        .map_err(|_| ResilienceError::Timeout(duration))
}

/// Timeout wrapper for operations
#[derive(Debug, Clone)]
pub struct Timeout {
    duration: Duration,
}

impl Timeout {
    /// Creates a new timeout
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Gets the timeout duration
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Awaits an operation with this timeout
    pub async fn execute<F, T>(&self, operation: F) -> ResilienceResult<T>
    where
        F: Future<Output = T>,
    {
        with_timeout(self.duration, operation).await
    }
}
