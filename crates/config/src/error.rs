//! Config errors

use std::path::PathBuf;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but holds nothing but whitespace
    #[error("{} is empty", path.display())]
    Empty { path: PathBuf },

    #[error("{} is not valid TOML: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not encode settings: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("Could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings that fail validation are never written
    #[error("Refusing to save invalid settings: {}", joined(.0))]
    Invalid(Vec<ValidationError>),

    #[error("This platform has no per-user config directory")]
    NoConfigDir,
}

fn joined(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn got(value: &Option<String>) -> String {
    value.as_ref().map(|v| format!(" (got {v})")).unwrap_or_default()
}

/// One setting outside its allowed values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {problem}{}", got(.value))]
pub struct ValidationError {
    /// Dotted key, e.g. `playback.words_per_minute`
    pub field: &'static str,
    pub problem: String,
    pub value: Option<String>,
}

impl ValidationError {
    pub fn new(field: &'static str, problem: impl Into<String>) -> Self {
        Self {
            field,
            problem: problem.into(),
            value: None,
        }
    }

    pub fn with_value(field: &'static str, problem: impl Into<String>, value: impl ToString) -> Self {
        Self {
            value: Some(value.to_string()),
            ..Self::new(field, problem)
        }
    }
}
