//! Speech engine adapter owned by a playback screen

use crate::engine::{QueueMode, SpeechEngine, UTTERANCE_ID};
use crate::error::{SpeechError, SpeechResult};
use crate::estimate::{estimate_duration_with, BASE_WORDS_PER_MINUTE};
use crate::progress::{ProgressTracker, UtteranceStatus};
use crate::voices::VoiceFilter;
use audiostories_core::{Duration, SpeechRate};
use audiostories_resilience::with_timeout;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Wraps a platform engine with progress tracking and a duration estimate.
///
/// Until `initialize` succeeds, `speak` does nothing and no voices are
/// reported. `shutdown` releases the engine once; later calls and drop are
/// no-ops.
pub struct SpeechAdapter {
    engine: Arc<dyn SpeechEngine>,
    tracker: Arc<ProgressTracker>,
    total_duration: watch::Sender<Duration>,
    speech_rate: Mutex<SpeechRate>,
    voice_filter: VoiceFilter,
    words_per_minute: f32,
    init_timeout: Option<std::time::Duration>,
    initialized: AtomicBool,
    shut_down: AtomicBool,
}

impl SpeechAdapter {
    pub fn new(engine: Arc<dyn SpeechEngine>) -> Self {
        Self {
            engine,
            tracker: Arc::new(ProgressTracker::new()),
            total_duration: watch::Sender::new(Duration::ZERO),
            speech_rate: Mutex::new(SpeechRate::NORMAL),
            voice_filter: VoiceFilter::default(),
            words_per_minute: BASE_WORDS_PER_MINUTE,
            init_timeout: None,
            initialized: AtomicBool::new(false),
            shut_down: AtomicBool::new(false),
        }
    }

    pub fn with_voice_filter(mut self, filter: VoiceFilter) -> Self {
        self.voice_filter = filter;
        self
    }

    pub fn with_words_per_minute(mut self, words_per_minute: f32) -> Self {
        self.words_per_minute = words_per_minute;
        self
    }

    /// Bounds how long `initialize` waits for the engine
    pub fn with_init_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.init_timeout = Some(timeout);
        self
    }

    /// Prepares the engine. Returns whether it is ready to speak.
    ///
    /// A failure leaves the adapter inert; calling again retries.
    pub async fn initialize(&self) -> bool {
        if self.is_shut_down() {
            log::warn!("Speech engine initialize called after shutdown");
            return false;
        }

        let listener = Arc::clone(&self.tracker);
        let init = self.engine.initialize(listener);
        let result = match self.init_timeout {
            Some(timeout) => with_timeout(timeout, init)
                .await
                .unwrap_or(Err(SpeechError::InitTimeout(timeout))),
            None => init.await,
        };

        match result {
            Ok(()) => {
                self.initialized.store(true, Ordering::SeqCst);
                log::debug!("Speech engine initialized");
                true
            }
            Err(e) => {
                log::warn!("Speech engine initialization failed: {}", e);
                false
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst) && !self.is_shut_down()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    pub fn speech_rate(&self) -> SpeechRate {
        *self.speech_rate.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Rate applied by the next `speak`; an utterance in flight keeps its rate
    pub fn set_speech_rate(&self, rate: SpeechRate) {
        *self.speech_rate.lock().unwrap_or_else(|e| e.into_inner()) = rate;
    }

    /// Speaks `text`, interrupting anything already playing.
    ///
    /// `voice` is matched by exact name against the engine catalog; when it is
    /// absent or unknown the engine default is used. The duration estimate is
    /// published before speech starts. Returns `Ok(false)` without touching
    /// the engine when the adapter is not initialized.
    pub fn speak(&self, text: &str, voice: Option<&str>) -> SpeechResult<bool> {
        if !self.is_initialized() {
            log::debug!("Ignoring speak request, speech engine not initialized");
            return Ok(false);
        }

        let selected = voice.and_then(|name| {
            let found = self.engine.voices().into_iter().find(|v| v.name == name);
            if found.is_none() {
                log::warn!("Voice {} not available, using engine default", name);
            }
            found
        });
        self.engine.set_voice(selected.as_ref())?;

        let rate = self.speech_rate();
        self.engine.set_rate(rate)?;

        self.tracker.begin(text.chars().count());
        self.total_duration
            .send_replace(estimate_duration_with(text, rate, self.words_per_minute));

        self.engine.speak(text, QueueMode::Flush, UTTERANCE_ID)?;
        Ok(true)
    }

    /// Halts speech and resets progress. Safe to call at any time.
    pub fn stop(&self) {
        if self.is_initialized() {
            if let Err(e) = self.engine.stop() {
                log::warn!("Failed to stop speech engine: {}", e);
            }
        }
        self.tracker.reset();
    }

    /// Names of the network-quality voices for the reference locale
    pub fn available_voices(&self) -> Vec<String> {
        if !self.is_initialized() {
            return Vec::new();
        }
        self.voice_filter.apply(&self.engine.voices())
    }

    /// Releases the engine. Returns `true` only for the call that did it.
    pub fn shutdown(&self) -> bool {
        if self
            .shut_down
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }

        self.tracker.detach();
        self.engine.shutdown();
        log::debug!("Speech engine shut down");
        true
    }

    pub fn progress(&self) -> watch::Receiver<f32> {
        self.tracker.progress()
    }

    pub fn total_duration(&self) -> watch::Receiver<Duration> {
        self.total_duration.subscribe()
    }

    pub fn status(&self) -> watch::Receiver<UtteranceStatus> {
        self.tracker.status()
    }

    /// Number of the last utterance started by `speak`, 0 before the first
    pub fn current_utterance(&self) -> u64 {
        self.tracker.current_utterance()
    }
}

impl Drop for SpeechAdapter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for SpeechAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechAdapter")
            .field("initialized", &self.is_initialized())
            .field("shut_down", &self.is_shut_down())
            .field("speech_rate", &self.speech_rate())
            .finish()
    }
}
