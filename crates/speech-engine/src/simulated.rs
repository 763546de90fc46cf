//! Speech engine that speaks into the void
//!
//! Records every call and reports utterance callbacks either on demand
//! (`emit`) or, with `with_playback`, from a tokio task that walks the text
//! one word per tick.

use crate::engine::{QueueMode, SpeechEngine, UtteranceEvent, UtteranceListener};
use crate::error::{SpeechError, SpeechResult};
use async_trait::async_trait;
use audiostories_core::{SpeechRate, Voice};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// A call made on the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Initialize,
    SetVoice(Option<String>),
    SetRate(f32),
    Speak {
        text: String,
        mode: QueueMode,
        utterance_id: String,
    },
    Stop,
    Shutdown,
}

#[derive(Default)]
struct EngineState {
    listener: Option<Arc<dyn UtteranceListener>>,
    calls: Vec<EngineCall>,
    voice: Option<Voice>,
}

pub struct SimulatedSpeechEngine {
    voices: Vec<Voice>,
    fail_init: bool,
    init_delay: Duration,
    playback_tick: Option<Duration>,
    state: Mutex<EngineState>,
    ready: AtomicBool,
    // Bumped by every speak/stop/shutdown; playback tasks quit when it moves
    generation: Arc<AtomicU64>,
}

impl Default for SimulatedSpeechEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedSpeechEngine {
    pub fn new() -> Self {
        Self {
            voices: Vec::new(),
            fail_init: false,
            init_delay: Duration::ZERO,
            playback_tick: None,
            state: Mutex::new(EngineState::default()),
            ready: AtomicBool::new(false),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn with_voices(mut self, voices: Vec<Voice>) -> Self {
        self.voices = voices;
        self
    }

    /// Makes `initialize` fail
    pub fn failing(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub fn with_init_delay(mut self, delay: Duration) -> Self {
        self.init_delay = delay;
        self
    }

    /// Plays each utterance on its own, one word per `tick`
    pub fn with_playback(mut self, tick: Duration) -> Self {
        self.playback_tick = Some(tick);
        self
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: EngineCall) {
        self.lock().calls.push(call);
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.lock().calls.clone()
    }

    /// How many recorded calls satisfy `predicate`
    pub fn count(&self, predicate: impl Fn(&EngineCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|call| predicate(*call)).count()
    }

    pub fn current_voice(&self) -> Option<Voice> {
        self.lock().voice.clone()
    }

    /// Delivers a callback to the registered listener, as the platform would.
    ///
    /// Still delivers after shutdown, like a straggling platform callback.
    pub fn emit(&self, utterance_id: &str, event: UtteranceEvent) {
        let listener = self.lock().listener.clone();
        if let Some(listener) = listener {
            listener.on_event(utterance_id, event);
        }
    }

    fn ensure_ready(&self) -> SpeechResult<()> {
        if self.ready.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SpeechError::NotInitialized)
        }
    }

    fn start_playback(&self, text: &str, utterance_id: &str, tick: Duration) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::warn!("No tokio runtime, simulated playback skipped");
            return;
        };
        let Some(listener) = self.lock().listener.clone() else {
            return;
        };

        let generation = Arc::clone(&self.generation);
        let mine = generation.load(Ordering::SeqCst);
        let words = word_spans(text);
        let utterance_id = utterance_id.to_string();

        runtime.spawn(async move {
            let current = || generation.load(Ordering::SeqCst) == mine;
            if !current() {
                return;
            }
            listener.on_event(&utterance_id, UtteranceEvent::Start);
            for (start, end) in words {
                tokio::time::sleep(tick).await;
                if !current() {
                    return;
                }
                listener.on_event(&utterance_id, UtteranceEvent::Range { start, end });
            }
            tokio::time::sleep(tick).await;
            if current() {
                listener.on_event(&utterance_id, UtteranceEvent::Done);
            }
        });
    }
}

/// Character offsets of each word
fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    let mut length = 0;
    for (index, c) in text.chars().enumerate() {
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(index),
            (true, Some(s)) => {
                spans.push((s, index));
                start = None;
            }
            _ => {}
        }
        length = index + 1;
    }
    if let Some(s) = start {
        spans.push((s, length));
    }
    spans
}

#[async_trait]
impl SpeechEngine for SimulatedSpeechEngine {
    async fn initialize(&self, listener: Arc<dyn UtteranceListener>) -> SpeechResult<()> {
        self.record(EngineCall::Initialize);
        if !self.init_delay.is_zero() {
            tokio::time::sleep(self.init_delay).await;
        }
        if self.fail_init {
            return Err(SpeechError::Unavailable("no speech engine installed".to_string()));
        }
        self.lock().listener = Some(listener);
        self.ready.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn voices(&self) -> Vec<Voice> {
        if self.ready.load(Ordering::SeqCst) {
            self.voices.clone()
        } else {
            Vec::new()
        }
    }

    fn set_voice(&self, voice: Option<&Voice>) -> SpeechResult<()> {
        self.record(EngineCall::SetVoice(voice.map(|v| v.name.clone())));
        self.ensure_ready()?;
        self.lock().voice = voice.cloned();
        Ok(())
    }

    fn set_rate(&self, rate: SpeechRate) -> SpeechResult<()> {
        self.record(EngineCall::SetRate(rate.value()));
        self.ensure_ready()
    }

    fn speak(&self, text: &str, mode: QueueMode, utterance_id: &str) -> SpeechResult<()> {
        self.record(EngineCall::Speak {
            text: text.to_string(),
            mode,
            utterance_id: utterance_id.to_string(),
        });
        self.ensure_ready()?;
        if mode == QueueMode::Flush {
            self.generation.fetch_add(1, Ordering::SeqCst);
        }
        if let Some(tick) = self.playback_tick {
            self.start_playback(text, utterance_id, tick);
        }
        Ok(())
    }

    fn stop(&self) -> SpeechResult<()> {
        self.record(EngineCall::Stop);
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.ensure_ready()
    }

    fn shutdown(&self) {
        self.record(EngineCall::Shutdown);
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.ready.store(false, Ordering::SeqCst);
    }
}
