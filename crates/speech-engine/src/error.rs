//! Speech engine errors

use audiostories_core::AppError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpeechError {
    #[error("Speech engine unavailable: {0}")]
    Unavailable(String),

    #[error("Speech engine not initialized")]
    NotInitialized,

    #[error("Speech engine has been shut down")]
    ShutDown,

    #[error("Speech engine initialization timed out after {0:?}")]
    InitTimeout(Duration),

    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),
}

pub type SpeechResult<T> = Result<T, SpeechError>;

impl From<SpeechError> for AppError {
    fn from(err: SpeechError) -> Self {
        AppError::SpeechEngineError {
            message: err.to_string(),
        }
    }
}
