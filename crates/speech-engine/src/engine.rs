//! Platform speech engine seam

use crate::error::SpeechResult;
use async_trait::async_trait;
use audiostories_core::{SpeechRate, Voice};
use std::sync::Arc;

/// Tag attached to every utterance; only one plays at a time
pub const UTTERANCE_ID: &str = "UTTERANCE_ID";

/// How a new utterance relates to the one playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueMode {
    /// Interrupt and discard whatever is playing
    Flush,
    /// Play after the queued utterances
    Add,
}

/// Progress callback reported by the engine for one utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UtteranceEvent {
    Start,
    Done,
    Error { message: String },
    /// The engine is about to speak characters `start..end`
    Range { start: usize, end: usize },
}

/// Receives utterance callbacks, possibly from an engine-owned thread
pub trait UtteranceListener: Send + Sync {
    fn on_event(&self, utterance_id: &str, event: UtteranceEvent);
}

/// Text-to-speech capability provided by the platform.
///
/// Methods take `&self`; implementations keep their own state behind locks
/// since callbacks may arrive on other threads.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Prepares the engine and registers the listener for utterance callbacks
    async fn initialize(&self, listener: Arc<dyn UtteranceListener>) -> SpeechResult<()>;

    /// The engine's full voice catalog
    fn voices(&self) -> Vec<Voice>;

    /// Selects a voice; `None` restores the engine default
    fn set_voice(&self, voice: Option<&Voice>) -> SpeechResult<()>;

    fn set_rate(&self, rate: SpeechRate) -> SpeechResult<()>;

    fn speak(&self, text: &str, mode: QueueMode, utterance_id: &str) -> SpeechResult<()>;

    fn stop(&self) -> SpeechResult<()>;

    /// Releases the engine. No other call is valid afterwards.
    fn shutdown(&self);
}
