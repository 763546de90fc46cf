//! Speech synthesis settings

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Speech rate multiplier (0.5x - 2.0x)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeechRate(f32);

impl SpeechRate {
    /// Slowest supported rate
    pub const MIN: f32 = 0.5;
    /// Fastest supported rate
    pub const MAX: f32 = 2.0;
    /// Engine default
    pub const NORMAL: Self = Self(1.0);

    /// Creates a new speech rate, rejecting values outside 0.5 - 2.0
    pub fn new(rate: f32) -> Result<Self, AppError> {
        if rate.is_finite() && (Self::MIN..=Self::MAX).contains(&rate) {
            Ok(Self(rate))
        } else {
            Err(AppError::InvalidArgument {
                argument: "speech_rate".to_string(),
                reason: format!("{} is outside {} - {}", rate, Self::MIN, Self::MAX),
            })
        }
    }

    /// Creates a speech rate, pulling out-of-range values to the nearest bound
    pub fn clamped(rate: f32) -> Self {
        if rate.is_nan() {
            return Self::NORMAL;
        }
        Self(rate.clamp(Self::MIN, Self::MAX))
    }

    /// Returns the multiplier
    pub fn value(&self) -> f32 {
        self.0
    }
}

impl Default for SpeechRate {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for SpeechRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}x", self.0)
    }
}

/// An entry of the speech engine's voice catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Voice {
    /// Engine-specific voice identifier
    pub name: String,
    /// BCP 47 language tag, e.g. `en-US`
    pub locale: String,
}

impl Voice {
    pub fn new(name: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locale: locale.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_rate_bounds() {
        assert!(SpeechRate::new(0.5).is_ok());
        assert!(SpeechRate::new(2.0).is_ok());
        assert!(SpeechRate::new(0.49).is_err());
        assert!(SpeechRate::new(2.01).is_err());
        assert!(SpeechRate::new(f32::NAN).is_err());
    }

    #[test]
    fn test_speech_rate_clamped() {
        assert_eq!(SpeechRate::clamped(3.0).value(), 2.0);
        assert_eq!(SpeechRate::clamped(0.1).value(), 0.5);
        assert_eq!(SpeechRate::clamped(1.25).value(), 1.25);
        assert_eq!(SpeechRate::clamped(f32::NAN), SpeechRate::NORMAL);
    }

    #[test]
    fn test_speech_rate_default_and_display() {
        assert_eq!(SpeechRate::default().value(), 1.0);
        assert_eq!(SpeechRate::clamped(1.5).to_string(), "1.50x");
    }
}
