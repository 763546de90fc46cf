//! Maps utterance callbacks onto observable progress and status

use crate::engine::{UtteranceEvent, UtteranceListener, UTTERANCE_ID};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use tokio::sync::watch;

/// Lifecycle of the current utterance
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SpeechStatus {
    #[default]
    Idle,
    Speaking,
    Completed,
    Failed { reason: String },
}

impl SpeechStatus {
    /// True once the utterance ended, successfully or not
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed { .. })
    }
}

/// Status tagged with the utterance it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UtteranceStatus {
    /// Numbered by `ProgressTracker::begin`, 0 before the first one
    pub utterance: u64,
    pub status: SpeechStatus,
}

/// Listener handed to the engine.
///
/// Progress is `start / total_characters` of the last range callback, 0.0 on
/// start and error and 1.0 when done. Every status carries the number of the
/// utterance that was current when it was published. After `detach` every
/// callback is ignored.
#[derive(Debug)]
pub struct ProgressTracker {
    progress: watch::Sender<f32>,
    status: watch::Sender<UtteranceStatus>,
    utterance: AtomicU64,
    total_characters: AtomicUsize,
    detached: AtomicBool,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            progress: watch::Sender::new(0.0),
            status: watch::Sender::new(UtteranceStatus::default()),
            utterance: AtomicU64::new(0),
            total_characters: AtomicUsize::new(0),
            detached: AtomicBool::new(false),
        }
    }

    pub fn progress(&self) -> watch::Receiver<f32> {
        self.progress.subscribe()
    }

    pub fn status(&self) -> watch::Receiver<UtteranceStatus> {
        self.status.subscribe()
    }

    pub fn current_progress(&self) -> f32 {
        *self.progress.borrow()
    }

    pub fn current_utterance(&self) -> u64 {
        self.utterance.load(Ordering::SeqCst)
    }

    /// Prepares for a new utterance of `total_characters` characters and
    /// returns its number
    pub fn begin(&self, total_characters: usize) -> u64 {
        let utterance = self.utterance.fetch_add(1, Ordering::SeqCst) + 1;
        self.total_characters.store(total_characters, Ordering::SeqCst);
        self.progress.send_replace(0.0);
        self.status.send_replace(UtteranceStatus {
            utterance,
            status: SpeechStatus::Idle,
        });
        utterance
    }

    /// Back to idle with progress at zero
    pub fn reset(&self) {
        self.progress.send_replace(0.0);
        self.publish(SpeechStatus::Idle);
    }

    fn publish(&self, status: SpeechStatus) {
        self.status.send_modify(|current| current.status = status);
    }

    /// Stops reacting to callbacks for good
    pub fn detach(&self) {
        self.detached.store(true, Ordering::SeqCst);
    }

    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }
}

impl UtteranceListener for ProgressTracker {
    fn on_event(&self, utterance_id: &str, event: UtteranceEvent) {
        if self.is_detached() || utterance_id != UTTERANCE_ID {
            return;
        }

        match event {
            UtteranceEvent::Start => {
                self.progress.send_replace(0.0);
                self.publish(SpeechStatus::Speaking);
            }
            UtteranceEvent::Done => {
                self.progress.send_replace(1.0);
                self.publish(SpeechStatus::Completed);
            }
            UtteranceEvent::Error { message } => {
                log::warn!("Utterance failed: {}", message);
                self.progress.send_replace(0.0);
                self.publish(SpeechStatus::Failed { reason: message });
            }
            UtteranceEvent::Range { start, .. } => {
                let total = self.total_characters.load(Ordering::SeqCst);
                if total > 0 {
                    self.progress
                        .send_replace((start as f32 / total as f32).min(1.0));
                }
            }
        }
    }
}
