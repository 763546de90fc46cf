//! Reading and writing `config.toml`
//!
//! Writes land in a temporary file next to the target and are renamed over it,
//! so a crash never leaves half a file behind.

use crate::{Config, ConfigError, ConfigResult, CONFIG_VERSION};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Written above the settings so a hand-edited file explains itself
const HEADER: &str = "\
# Audio Stories settings
#
# Keys left out take their default value. `playback.default_speech_rate`
# must be between 0.5 and 2.0; `backend.fetch_attempts` between 1 and 10.

";

/// Reads the file, `None` when there is none yet.
///
/// Values are not range-checked here; callers decide whether an out-of-range
/// setting is fatal.
pub(crate) fn read(path: &Path) -> ConfigResult<Option<Config>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if contents.trim().is_empty() {
        return Err(ConfigError::Empty {
            path: path.to_path_buf(),
        });
    }

    let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if config.version > CONFIG_VERSION {
        log::warn!(
            "{} was written by a newer release (version {}, this one reads {})",
            path.display(),
            config.version,
            CONFIG_VERSION
        );
    }
    Ok(Some(config))
}

/// Validates `config` and atomically replaces the file with it
pub(crate) fn write(path: &Path, config: &Config) -> ConfigResult<()> {
    config.validate().map_err(ConfigError::Invalid)?;

    let write_error = |source: std::io::Error| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(write_error)?;

    let body = toml::to_string_pretty(config)?;
    let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
    file.write_all(HEADER.as_bytes()).map_err(write_error)?;
    file.write_all(body.as_bytes()).map_err(write_error)?;
    file.flush().map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;

    log::info!("Saved settings to {}", path.display());
    Ok(())
}
