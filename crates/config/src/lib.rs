//! Audio Stories configuration
//!
//! A TOML file with one section per concern, loaded through `ConfigManager`.
//!
//! Each section implements `ConfigSection` and checks its own ranges. A
//! missing file means defaults; writes replace the file atomically.
//!
//! # Example
//!
//! ```rust,no_run
//! use audiostories_config::{Config, ConfigManager};
//!
//! let manager = ConfigManager::new().expect("Failed to initialize config");
//! let config = manager.load_or_default();
//! println!("Speech rate: {}", config.playback.default_speech_rate);
//! ```

mod error;
mod manager;
mod persistence;
mod validation;

pub mod app_config;
mod backend_config;
mod playback_config;

pub use error::{ConfigError, ConfigResult, ValidationError};
pub use manager::ConfigManager;
pub use validation::{Checks, ConfigSection};

pub use app_config::{AppConfig, LogLevel};
pub use backend_config::BackendConfig;
pub use playback_config::PlaybackConfig;

use serde::{Deserialize, Serialize};

/// Current config file format version
pub const CONFIG_VERSION: u32 = 1;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Config file format version
    pub version: u32,

    /// Logging and storage location
    pub app: AppConfig,

    /// Speech rate, voice selection and duration estimate
    pub playback: PlaybackConfig,

    /// Retry and transaction limits for the document backend
    pub backend: BackendConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates every section, returning all errors found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(mut e) = self.app.validate() {
            errors.append(&mut e);
        }

        if let Err(mut e) = self.playback.validate() {
            errors.append(&mut e);
        }

        if let Err(mut e) = self.backend.validate() {
            errors.append(&mut e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            app: AppConfig::default(),
            playback: PlaybackConfig::default(),
            backend: BackendConfig::default(),
        }
    }
}
