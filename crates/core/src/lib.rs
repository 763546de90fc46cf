//! Shared domain types and the error taxonomy for Audio Stories

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, ErrorSeverity, RecoveryAction, Result};
pub use types::{
    direct_image_url, Duration, Medal, RankedStory, Session, SpeechRate, Story, StoryId,
    Timestamp, User, UserStats, Voice,
};
