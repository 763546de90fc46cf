//! Playback configuration section

use crate::validation::{Checks, ConfigSection, ValidationError};
use serde::{Deserialize, Serialize};

/// Speech settings for the story screen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Rate a screen starts with (0.5 - 2.0)
    pub default_speech_rate: f32,

    /// Base speaking speed used for the duration estimate
    pub words_per_minute: f32,

    /// Substring a voice name must contain to be offered
    pub voice_marker: String,

    /// Locale offered voices must match
    pub voice_locale: String,

    /// Delay between words of the simulated engine, in milliseconds
    pub progress_tick_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_speech_rate: 1.0,
            words_per_minute: 150.0,
            voice_marker: "network".to_string(),
            voice_locale: "en-US".to_string(),
            progress_tick_ms: 50,
        }
    }
}

impl ConfigSection for PlaybackConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        Checks::new()
            .within("playback.default_speech_rate", self.default_speech_rate, 0.5..=2.0)
            .within("playback.words_per_minute", self.words_per_minute, 60.0..=400.0)
            .filled("playback.voice_marker", &self.voice_marker)
            .filled("playback.voice_locale", &self.voice_locale)
            .within("playback.progress_tick_ms", self.progress_tick_ms, 1..=5_000)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PlaybackConfig::default().validate().is_ok());
    }

    #[test]
    fn test_speech_rate_bounds() {
        let mut config = PlaybackConfig::default();
        config.default_speech_rate = 2.0;
        assert!(config.validate().is_ok());

        config.default_speech_rate = 2.5;
        let errors = config.validate().unwrap_err();
        assert_eq!(errors[0].field, "playback.default_speech_rate");
        assert_eq!(errors[0].value.as_deref(), Some("2.5"));
    }

    #[test]
    fn test_blank_voice_settings_rejected() {
        let config = PlaybackConfig {
            voice_marker: " ".to_string(),
            voice_locale: String::new(),
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().len(), 2);
    }
}
