// crates/resilience/src/retry.rs
//! Bounded retry with exponential backoff

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Retry policy configuration
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first attempt)
    max_attempts: usize,
    /// Initial delay between retries
    initial_delay: Duration,
    /// Maximum delay between retries
    max_delay: Duration,
    /// Backoff multiplier
    multiplier: f64,
    /// Whether to use jitter
    use_jitter: bool,
}

impl RetryPolicy {
    /// Creates a new retry policy. A policy always makes at least one attempt.
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            use_jitter: true,
        }
    }

    /// Policy that retries immediately, without sleeping between attempts
    pub fn immediate(max_attempts: usize) -> Self {
        Self::new(max_attempts)
            .with_initial_delay(Duration::ZERO)
            .with_jitter(false)
    }

    /// Sets the initial delay
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the backoff multiplier
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Sets whether to use jitter
    pub fn with_jitter(mut self, use_jitter: bool) -> Self {
        self.use_jitter = use_jitter;
        self
    }

    /// Calculates the delay before the given retry (attempt 0 is the first call)
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        if attempt == 0 {
            return Duration::from_secs(0);
        }

        let base_delay = self.initial_delay.as_millis() as f64
            * self.multiplier.powi((attempt - 1) as i32);

        let capped_delay = base_delay.min(self.max_delay.as_millis() as f64);

        let final_delay = if self.use_jitter {
            // Up to 25% jitter
            let jitter_factor = 0.75 + (attempt as f64 * 0.1 % 0.25);
            capped_delay * jitter_factor
        } else {
            capped_delay
        };

        Duration::from_millis(final_delay as u64)
    }

    /// Returns the maximum number of attempts
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Runs an async operation until it succeeds or the policy's attempts are used up.
///
/// Returns the error of the final attempt unchanged, so callers see the
/// underlying failure rather than a wrapper.
pub async fn retry_async<F, Fut, T, E>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                attempt += 1;
                let remaining = policy.max_attempts().saturating_sub(attempt);
                if remaining == 0 {
                    log::warn!("Giving up after {} attempt(s): {}", attempt, e);
                    return Err(e);
                }

                let delay = policy.delay_for_attempt(attempt);
                log::warn!(
                    "Attempt {} failed: {}; retrying in {:?} ({} left)",
                    attempt,
                    e,
                    delay,
                    remaining
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
