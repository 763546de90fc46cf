//! Playback coordinator for one story screen
//!
//! The coordinator owns the screen's `SpeechAdapter` and every task it
//! starts. Story loads, speech initialization and statistics writes run as
//! spawned tasks so the presentation layer never blocks; `teardown` (or
//! dropping the coordinator) aborts whatever is still running and releases
//! the speech engine exactly once.

use crate::state::{
    LoadPhase, PlaybackStatus, ScreenState, LOAD_FAILED_MESSAGE, NOT_FOUND_MESSAGE,
    PLAYBACK_FAILED_MESSAGE,
};
use audiostories_core::{Duration, SpeechRate, StoryId};
use audiostories_library::{StatsStore, StoryStore};
use audiostories_speech::{SpeechAdapter, SpeechStatus, UtteranceStatus};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle, JoinSet};

struct Inner {
    stories: StoryStore,
    stats: StatsStore,
    adapter: SpeechAdapter,
    state: watch::Sender<ScreenState>,
    fetch_in_flight: AtomicBool,
    torn_down: AtomicBool,
    // Utterance the screen shows as playing, 0 when stopped
    playing: AtomicU64,
}

impl Inner {
    fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    /// Applies `f` unless the screen is gone
    fn update(&self, f: impl FnOnce(&mut ScreenState)) {
        if self.is_torn_down() {
            return;
        }
        self.state.send_modify(f);
    }

    async fn load_story(&self, id: StoryId) {
        let result = self.stories.fetch_by_id(id.as_str()).await;
        self.fetch_in_flight.store(false, Ordering::SeqCst);

        match result {
            Ok(Some(story)) => {
                log::debug!("Loaded story {}", id);
                self.update(|s| {
                    s.phase = LoadPhase::Ready;
                    s.story = Some(story);
                    s.error_message = None;
                });
            }
            Ok(None) => {
                log::warn!("Story {} does not exist", id);
                self.update(|s| {
                    s.phase = LoadPhase::Error;
                    s.error_message = Some(NOT_FOUND_MESSAGE.to_string());
                });
            }
            Err(e) => {
                log::error!("Failed to load story {}: {}", id, e);
                self.update(|s| {
                    s.phase = LoadPhase::Error;
                    s.error_message = Some(LOAD_FAILED_MESSAGE.to_string());
                });
            }
        }
    }

    async fn initialize_speech(&self) {
        if !self.adapter.initialize().await {
            return;
        }
        let voices = self.adapter.available_voices();
        log::debug!("{} voice(s) available", voices.len());
        self.update(|s| {
            s.speech_ready = true;
            s.voices = voices;
        });
    }

    async fn record_play(&self, id: StoryId) {
        if let Err(e) = self.stats.record_play(&id).await {
            log::warn!("Failed to record play of story {}: {}", id, e);
        }
    }

    /// Moves playback back to stopped once an utterance finishes
    async fn follow_speech(&self, mut status: watch::Receiver<UtteranceStatus>) {
        while status.changed().await.is_ok() {
            let current = status.borrow_and_update().clone();
            match current.status {
                SpeechStatus::Completed => self.finish_utterance(current.utterance, None),
                SpeechStatus::Failed { reason } => {
                    self.finish_utterance(current.utterance, Some(reason))
                }
                SpeechStatus::Idle | SpeechStatus::Speaking => {}
            }
        }
    }

    /// Stops playback when `utterance` is the one playing.
    ///
    /// The check runs under the state lock, so it cannot interleave with a
    /// `play` that starts the next utterance.
    fn finish_utterance(&self, utterance: u64, failure: Option<String>) {
        if self.is_torn_down() {
            return;
        }
        self.state.send_if_modified(|s| {
            if self.playing.load(Ordering::SeqCst) != utterance {
                log::debug!("Ignoring end of stale utterance {}", utterance);
                return false;
            }
            self.playing.store(0, Ordering::SeqCst);
            s.playback = PlaybackStatus::Stopped;
            if let Some(reason) = &failure {
                log::warn!("Playback failed: {}", reason);
                s.error_message = Some(PLAYBACK_FAILED_MESSAGE.to_string());
            }
            true
        });
    }
}

/// Screen tasks still running.
///
/// `settle` takes the set out to await it, so `handles` is what `teardown`
/// aborts.
#[derive(Default)]
struct Tasks {
    set: JoinSet<()>,
    handles: Vec<AbortHandle>,
}

/// Drives story loading, speech and play statistics for one screen.
///
/// Must be created and used inside a tokio runtime.
pub struct PlaybackCoordinator {
    inner: Arc<Inner>,
    tasks: Mutex<Tasks>,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl PlaybackCoordinator {
    pub fn new(stories: StoryStore, stats: StatsStore, adapter: SpeechAdapter) -> Self {
        let status = adapter.status();
        let inner = Arc::new(Inner {
            stories,
            stats,
            adapter,
            state: watch::Sender::new(ScreenState::default()),
            fetch_in_flight: AtomicBool::new(false),
            torn_down: AtomicBool::new(false),
            playing: AtomicU64::new(0),
        });

        let follower = Arc::clone(&inner);
        let watcher = tokio::spawn(async move { follower.follow_speech(status).await });

        Self {
            inner,
            tasks: Mutex::new(Tasks::default()),
            watcher: Mutex::new(Some(watcher)),
        }
    }

    fn lock_tasks(&self) -> MutexGuard<'_, Tasks> {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn spawn<F, Fut>(&self, task: F)
    where
        F: FnOnce(Arc<Inner>) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.lock_tasks();
        // Checked under the lock so teardown either sees this task or prevents it
        if self.inner.is_torn_down() {
            return;
        }
        let fut = task(Arc::clone(&self.inner));
        tasks.handles.retain(|handle| !handle.is_finished());
        let handle = tasks.set.spawn(fut);
        tasks.handles.push(handle);
    }

    /// Screen entry: loads the story and prepares the speech engine
    pub fn enter(&self, story_id: impl Into<StoryId>) {
        self.fetch_story(story_id);
        self.initialize_speech();
    }

    /// Starts loading `story_id`.
    ///
    /// Ignored while a load is in flight or once a story is loaded.
    pub fn fetch_story(&self, story_id: impl Into<StoryId>) {
        if self.inner.is_torn_down() || self.inner.state.borrow().story.is_some() {
            return;
        }
        if self.inner.fetch_in_flight.swap(true, Ordering::SeqCst) {
            log::debug!("Story load already in flight");
            return;
        }

        let id = story_id.into();
        self.inner.update(|s| {
            s.phase = LoadPhase::Loading;
            s.error_message = None;
        });
        self.spawn(move |inner| async move { inner.load_story(id).await });
    }

    /// Initializes the speech engine in the background and publishes its voices
    pub fn initialize_speech(&self) {
        self.spawn(|inner| async move { inner.initialize_speech().await });
    }

    /// Speaks the loaded story and records the play.
    ///
    /// Returns `false` when there is no story or the engine is not ready.
    pub fn play(&self) -> bool {
        if self.inner.is_torn_down() {
            return false;
        }
        let state = self.inner.state.borrow().clone();
        let Some(story) = state.story else {
            log::debug!("Play requested before the story loaded");
            return false;
        };

        let adapter = &self.inner.adapter;
        adapter.set_speech_rate(state.speech_rate);
        match adapter.speak(&story.content, state.selected_voice.as_deref()) {
            Ok(true) => {}
            Ok(false) => return false,
            Err(e) => {
                log::error!("Failed to start speech: {}", e);
                self.inner
                    .update(|s| s.error_message = Some(PLAYBACK_FAILED_MESSAGE.to_string()));
                return false;
            }
        }

        let utterance = adapter.current_utterance();
        self.inner.update(|s| {
            self.inner.playing.store(utterance, Ordering::SeqCst);
            s.playback = PlaybackStatus::Playing;
            if s.phase == LoadPhase::Ready {
                s.error_message = None;
            }
        });

        let id = story.id;
        self.spawn(move |inner| async move { inner.record_play(id).await });
        true
    }

    pub fn stop(&self) {
        self.inner.adapter.stop();
        self.inner.update(|s| {
            self.inner.playing.store(0, Ordering::SeqCst);
            s.playback = PlaybackStatus::Stopped;
        });
    }

    /// Sets the rate used by the next `play`, clamped to the supported range
    pub fn set_speech_rate(&self, rate: f32) {
        let rate = SpeechRate::clamped(rate);
        self.inner.adapter.set_speech_rate(rate);
        self.inner.update(|s| s.speech_rate = rate);
    }

    /// Chooses a voice by name; `None` goes back to the engine default
    pub fn select_voice(&self, voice: Option<String>) {
        self.inner.update(|s| s.selected_voice = voice);
    }

    pub fn state(&self) -> watch::Receiver<ScreenState> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> ScreenState {
        self.inner.state.borrow().clone()
    }

    pub fn progress(&self) -> watch::Receiver<f32> {
        self.inner.adapter.progress()
    }

    pub fn total_duration(&self) -> watch::Receiver<Duration> {
        self.inner.adapter.total_duration()
    }

    pub fn speech_status(&self) -> watch::Receiver<UtteranceStatus> {
        self.inner.adapter.status()
    }

    /// Waits until every load, initialization and stats task has finished
    pub async fn settle(&self) {
        loop {
            let mut tasks = std::mem::take(&mut self.lock_tasks().set);
            if tasks.is_empty() {
                return;
            }
            while let Some(result) = tasks.join_next().await {
                if let Err(e) = result {
                    if e.is_panic() {
                        log::error!("Screen task panicked: {}", e);
                    }
                }
            }
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.is_torn_down()
    }

    /// Cancels outstanding work, stops speech and releases the engine.
    ///
    /// Only the first call has any effect.
    pub fn teardown(&self) {
        if self.inner.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }

        {
            let mut tasks = self.lock_tasks();
            tasks.set.abort_all();
            for handle in tasks.handles.drain(..) {
                handle.abort();
            }
        }
        if let Some(watcher) = self.watcher.lock().unwrap_or_else(|e| e.into_inner()).take() {
            watcher.abort();
        }

        self.inner.adapter.stop();
        self.inner.adapter.shutdown();
        self.inner
            .state
            .send_modify(|s| s.playback = PlaybackStatus::Stopped);
        log::debug!("Playback screen torn down");
    }
}

impl Drop for PlaybackCoordinator {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for PlaybackCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackCoordinator")
            .field("state", &*self.inner.state.borrow())
            .field("adapter", &self.inner.adapter)
            .field("torn_down", &self.is_torn_down())
            .finish()
    }
}
