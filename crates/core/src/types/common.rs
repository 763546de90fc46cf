//! Common types shared across domain models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp in milliseconds since Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp for the current moment
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }

    /// Creates a timestamp from milliseconds since Unix epoch
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as milliseconds since Unix epoch
    pub fn as_millis(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Duration in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Duration(u64);

impl Duration {
    /// Zero duration constant
    pub const ZERO: Self = Self(0);

    /// Creates a duration from milliseconds
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Creates a duration from seconds
    pub fn from_seconds(seconds: u64) -> Self {
        Self(seconds * 1000)
    }

    /// Returns the duration in milliseconds
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Returns the duration in seconds
    pub fn as_seconds(&self) -> u64 {
        self.0 / 1000
    }

    /// Returns true if the duration is zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Formats as M:SS, the way the player shows elapsed and total time
    pub fn as_clock(&self) -> String {
        let total_seconds = self.as_seconds();
        format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_clock())
    }
}

impl From<std::time::Duration> for Duration {
    fn from(d: std::time::Duration) -> Self {
        Self(d.as_millis() as u64)
    }
}

impl From<Duration> for std::time::Duration {
    fn from(d: Duration) -> Self {
        std::time::Duration::from_millis(d.0)
    }
}
