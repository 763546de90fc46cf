//! Observable screen state

use audiostories_core::{SpeechRate, Story};

/// Shown when the story read fails after its retries
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load story.";

/// Shown when the story does not exist
pub const NOT_FOUND_MESSAGE: &str = "Story not found.";

/// Shown when the engine reports a failed utterance
pub const PLAYBACK_FAILED_MESSAGE: &str = "Playback failed.";

/// Story load progress of one screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// Playback sub-state, meaningful once the story is ready
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
}

/// Everything the presentation layer renders for a story screen.
///
/// Progress and estimated duration change far more often and are published
/// on their own channels by the coordinator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScreenState {
    pub phase: LoadPhase,
    pub story: Option<Story>,
    pub error_message: Option<String>,
    pub speech_ready: bool,
    pub voices: Vec<String>,
    pub selected_voice: Option<String>,
    pub speech_rate: SpeechRate,
    pub playback: PlaybackStatus,
}

impl ScreenState {
    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn is_playing(&self) -> bool {
        self.playback == PlaybackStatus::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = ScreenState::default();
        assert_eq!(state.phase, LoadPhase::Idle);
        assert!(!state.is_loading());
        assert!(!state.is_playing());
        assert_eq!(state.speech_rate, SpeechRate::NORMAL);
        assert!(state.voices.is_empty());
    }
}
