// crates/resilience/src/lib.rs
//! Resilience patterns for calls into the hosted backend
//!
//! - Bounded retry with exponential backoff
//! - Timeout handling
//!
//! # Example
//!
//! ```rust
//! use audiostories_resilience::{retry_async, RetryPolicy};
//! use std::time::Duration;
//!
//! # async fn demo() {
//! let policy = RetryPolicy::new(3).with_initial_delay(Duration::from_millis(1));
//! let value = retry_async(&policy, || async { Ok::<_, String>(7) }).await;
//! assert_eq!(value, Ok(7));
//! # }
//! ```

mod error;
mod retry;
mod timeout;

pub use error::{ResilienceError, ResilienceResult};
pub use retry::{retry_async, RetryPolicy};
pub use timeout::{with_timeout, Timeout};
