//! Where the config file lives and how it is loaded

use crate::{persistence, Config, ConfigError, ConfigResult};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const FILE_NAME: &str = "config.toml";

const ENV_SPEECH_RATE: &str = "AUDIOSTORIES_PLAYBACK_DEFAULT_SPEECH_RATE";
const ENV_DATABASE_PATH: &str = "AUDIOSTORIES_APP_DATABASE_PATH";
const ENV_FETCH_ATTEMPTS: &str = "AUDIOSTORIES_BACKEND_FETCH_ATTEMPTS";

/// Owns the path of `config.toml`.
///
/// By default the file sits in the per-user config directory
/// (`~/.config/audiostories/` on Linux).
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> ConfigResult<Self> {
        let dirs = ProjectDirs::from("", "", "audiostories").ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_directory(dirs.config_dir()))
    }

    pub fn with_directory(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Defaults when the file does not exist; an error when it is unreadable
    pub fn load(&self) -> ConfigResult<Config> {
        match persistence::read(&self.path)? {
            Some(config) => Ok(config),
            None => {
                log::info!("No settings at {}, using defaults", self.path.display());
                Ok(Config::default())
            }
        }
    }

    pub fn load_or_default(&self) -> Config {
        self.load().unwrap_or_else(|e| {
            log::warn!("{}, using defaults", e);
            Config::default()
        })
    }

    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        persistence::write(&self.path, config)
    }

    /// Applies `change` to the stored settings and saves them.
    ///
    /// Nothing is written when the changed settings are invalid.
    pub fn update(&self, change: impl FnOnce(&mut Config)) -> ConfigResult<()> {
        let mut config = self.load()?;
        change(&mut config);
        self.save(&config)
    }

    /// Writes the defaults unless a file is already there. Returns whether it wrote.
    pub fn initialize(&self) -> ConfigResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.save(&Config::default())?;
        Ok(true)
    }

    pub fn reset(&self) -> ConfigResult<()> {
        self.save(&Config::default())
    }

    /// [`load`](Self::load), then the `AUDIOSTORIES_*` variables on top.
    ///
    /// Recognized: `AUDIOSTORIES_PLAYBACK_DEFAULT_SPEECH_RATE`,
    /// `AUDIOSTORIES_APP_DATABASE_PATH` and `AUDIOSTORIES_BACKEND_FETCH_ATTEMPTS`.
    /// A value that does not parse is skipped with a warning.
    pub fn load_with_env_overrides(&self) -> ConfigResult<Config> {
        let mut config = self.load()?;

        if let Some(rate) = env_override(ENV_SPEECH_RATE) {
            config.playback.default_speech_rate = rate;
        }
        if let Some(path) = std::env::var_os(ENV_DATABASE_PATH) {
            config.app.database_path = PathBuf::from(path);
        }
        if let Some(attempts) = env_override(ENV_FETCH_ATTEMPTS) {
            config.backend.fetch_attempts = attempts;
        }
        Ok(config)
    }
}

fn env_override<T: FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        log::warn!("Ignoring {}={:?}: not a valid value", name, raw);
    }
    parsed
}
