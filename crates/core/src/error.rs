//! Error types and recovery strategies for Audio Stories
//!
//! Every failure the playback and statistics flow can hit is classified into one of
//! three severity tiers:
//! - **Recoverable**: Can be automatically retried (transient fetch failures, write conflicts)
//! - **Degraded**: Feature disabled but app continues (speech engine unavailable, missing story)
//! - **Fatal**: Requires user intervention (bad configuration)
//!
//! Each error includes a recovery action so the coordinator can decide what to surface.

use std::fmt;
use thiserror::Error;

/// Recovery actions that can be taken when an error occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Retry the operation immediately (e.g., optimistic write lost a race)
    RetryImmediate,
    /// Retry with exponential backoff (e.g., backend temporarily unreachable)
    RetryWithBackoff,
    /// Disable the failing feature and continue (e.g., no speech engine)
    DisableFeature,
    /// Ask the user to sign in again
    Reauthenticate,
    /// No automatic recovery - user intervention required
    UserIntervention,
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RetryImmediate => write!(f, "Retrying immediately"),
            Self::RetryWithBackoff => write!(f, "Retrying with backoff"),
            Self::DisableFeature => write!(f, "Disabling feature"),
            Self::Reauthenticate => write!(f, "Sign-in required"),
            Self::UserIntervention => write!(f, "User intervention required"),
        }
    }
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Error can be automatically recovered from
    Recoverable,
    /// Feature degraded but app can continue
    Degraded,
    /// Critical error requiring user action
    Fatal,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recoverable => write!(f, "Recoverable"),
            Self::Degraded => write!(f, "Degraded"),
            Self::Fatal => write!(f, "Fatal"),
        }
    }
}

/// Main error type for Audio Stories
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Network Errors =====
    /// Backend request failed
    #[error("Network error: {message}")]
    NetworkError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ===== Document Store Errors =====
    /// Document store operation failed
    #[error("Database error: {message}")]
    DatabaseError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Document not found in the store
    #[error("Record not found: {entity} with {identifier}")]
    RecordNotFound { entity: String, identifier: String },

    /// Stored document could not be mapped onto a domain type
    #[error("Failed to deserialize {entity}: {reason}")]
    DeserializationError { entity: String, reason: String },

    /// Optimistic transaction kept losing to concurrent writers
    #[error("Transaction on {document} aborted after {attempts} conflicting attempts")]
    TransactionConflict { document: String, attempts: usize },

    // ===== Authentication Errors =====
    /// Operation requires a signed-in user
    #[error("User must be logged in to {operation}")]
    Unauthenticated { operation: String },

    /// Sign-in or registration rejected
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    // ===== Speech Errors =====
    /// Platform speech engine reported a failure
    #[error("Speech engine error: {message}")]
    SpeechEngineError { message: String },

    // ===== Configuration Errors =====
    /// Invalid configuration
    #[error("Invalid configuration: {setting} = '{value}' ({reason})")]
    InvalidConfiguration {
        setting: String,
        value: String,
        reason: String,
    },

    // ===== Generic Errors =====
    /// Generic internal error
    #[error("Internal error: {message}")]
    InternalError { message: String },

    /// Invalid argument provided
    #[error("Invalid argument: {argument} - {reason}")]
    InvalidArgument { argument: String, reason: String },
}

impl AppError {
    /// Returns the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NetworkError { .. }
            | Self::DatabaseError { .. }
            | Self::TransactionConflict { .. } => ErrorSeverity::Recoverable,

            Self::RecordNotFound { .. }
            | Self::DeserializationError { .. }
            | Self::SpeechEngineError { .. }
            | Self::Unauthenticated { .. }
            | Self::AuthenticationFailed { .. } => ErrorSeverity::Degraded,

            Self::InvalidConfiguration { .. } => ErrorSeverity::Fatal,

            _ => ErrorSeverity::Degraded,
        }
    }

    /// Returns the recommended recovery action for this error
    pub fn recovery_action(&self) -> RecoveryAction {
        match self {
            Self::TransactionConflict { .. } => RecoveryAction::RetryImmediate,

            Self::NetworkError { .. } | Self::DatabaseError { .. } => {
                RecoveryAction::RetryWithBackoff
            }

            Self::SpeechEngineError { .. } => RecoveryAction::DisableFeature,

            Self::Unauthenticated { .. } | Self::AuthenticationFailed { .. } => {
                RecoveryAction::Reauthenticate
            }

            _ => RecoveryAction::UserIntervention,
        }
    }

    /// Returns a user-friendly error message suitable for display in the UI
    pub fn user_message(&self) -> String {
        match self {
            Self::NetworkError { .. } => {
                "Cannot connect to the internet. Please check your connection.".to_string()
            }
            Self::DatabaseError { .. } | Self::TransactionConflict { .. } => {
                "The service is temporarily unavailable. Please try again.".to_string()
            }
            Self::RecordNotFound { .. } => "The requested item was not found.".to_string(),
            Self::DeserializationError { .. } => {
                "Received invalid data from the server.".to_string()
            }
            Self::Unauthenticated { .. } => "Please sign in to continue.".to_string(),
            Self::AuthenticationFailed { .. } => {
                "Sign-in failed. Please check your email and password.".to_string()
            }
            Self::SpeechEngineError { .. } => {
                "Text-to-speech is not available on this device.".to_string()
            }
            Self::InvalidConfiguration { setting, .. } => {
                format!("Invalid setting: {}. Please check your configuration.", setting)
            }
            Self::InternalError { .. } => {
                "An unexpected error occurred. Please try again.".to_string()
            }
            Self::InvalidArgument { .. } => "Invalid input provided.".to_string(),
        }
    }

    /// Returns true if this error should be logged at ERROR level
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Fatal
    }

    /// Helper for a setting outside its allowed values
    pub fn invalid_configuration(
        setting: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfiguration {
            setting: setting.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Helper to create a network error from any error type
    pub fn network<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Helper to create a database error from any error type
    pub fn database<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::DatabaseError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Helper for a missing signed-in user
    pub fn unauthenticated(operation: impl Into<String>) -> Self {
        Self::Unauthenticated {
            operation: operation.into(),
        }
    }

    /// Helper for poisoned locks and other broken invariants
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::DeserializationError {
            entity: "document".to_string(),
            reason: err.to_string(),
        }
    }
}
