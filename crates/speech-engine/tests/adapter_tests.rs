//! Speech adapter behaviour against the simulated engine

use audiostories_core::{SpeechRate, Voice};
use audiostories_speech::{
    EngineCall, QueueMode, SimulatedSpeechEngine, SpeechAdapter, SpeechStatus, UtteranceEvent,
    UTTERANCE_ID,
};
use std::sync::Arc;
use std::time::Duration;

fn catalog() -> Vec<Voice> {
    vec![
        Voice::new("net-en-1", "en-US"),
        Voice::new("en-us-local", "en-US"),
        Voice::new("net-fr-1", "fr-FR"),
        Voice::new("en-us-x-network", "en-US"),
        Voice::new("en-gb-x-network", "en-GB"),
    ]
}

fn adapter_over(engine: &Arc<SimulatedSpeechEngine>) -> SpeechAdapter {
    SpeechAdapter::new(engine.clone())
        .with_voice_filter(audiostories_speech::VoiceFilter::new("net-", "en-US"))
}

#[tokio::test]
async fn test_speak_before_initialize_is_noop() {
    let engine = Arc::new(SimulatedSpeechEngine::new().with_voices(catalog()));
    let adapter = adapter_over(&engine);

    assert_eq!(adapter.speak("The quick fox", None), Ok(false));
    assert!(adapter.available_voices().is_empty());
    assert!(engine.calls().is_empty());
    assert!(adapter.total_duration().borrow().is_zero());
}

#[tokio::test]
async fn test_failed_initialize_leaves_adapter_inert() {
    let engine = Arc::new(SimulatedSpeechEngine::new().failing());
    let adapter = adapter_over(&engine);

    assert!(!adapter.initialize().await);
    assert!(!adapter.is_initialized());
    assert_eq!(adapter.speak("hello", None), Ok(false));
}

#[tokio::test(start_paused = true)]
async fn test_initialize_timeout() {
    let engine = Arc::new(SimulatedSpeechEngine::new().with_init_delay(Duration::from_secs(30)));
    let adapter = adapter_over(&engine).with_init_timeout(Duration::from_secs(1));

    assert!(!adapter.initialize().await);
}

#[tokio::test]
async fn test_available_voices_filtered() {
    let engine = Arc::new(SimulatedSpeechEngine::new().with_voices(catalog()));
    let adapter = SpeechAdapter::new(engine.clone());
    assert!(adapter.initialize().await);

    assert_eq!(adapter.available_voices(), vec!["en-us-x-network"]);
}

#[tokio::test]
async fn test_speak_sets_voice_rate_and_estimate() {
    let engine = Arc::new(SimulatedSpeechEngine::new().with_voices(catalog()));
    let adapter = adapter_over(&engine);
    assert!(adapter.initialize().await);
    assert_eq!(adapter.available_voices(), vec!["net-en-1"]);

    adapter.set_speech_rate(SpeechRate::clamped(2.0));
    assert_eq!(adapter.speak("one two three four five", Some("net-en-1")), Ok(true));

    assert_eq!(adapter.total_duration().borrow().as_millis(), 1000);
    assert_eq!(engine.current_voice(), Some(Voice::new("net-en-1", "en-US")));
    assert_eq!(
        engine.calls(),
        vec![
            EngineCall::Initialize,
            EngineCall::SetVoice(Some("net-en-1".to_string())),
            EngineCall::SetRate(2.0),
            EngineCall::Speak {
                text: "one two three four five".to_string(),
                mode: QueueMode::Flush,
                utterance_id: UTTERANCE_ID.to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn test_unknown_voice_falls_back_to_default() {
    let engine = Arc::new(SimulatedSpeechEngine::new().with_voices(catalog()));
    let adapter = adapter_over(&engine);
    assert!(adapter.initialize().await);

    adapter.speak("hi", Some("net-en-1")).unwrap();
    adapter.speak("hi", Some("missing")).unwrap();

    assert_eq!(engine.current_voice(), None);
}

#[tokio::test]
async fn test_rate_change_does_not_touch_current_estimate() {
    let engine = Arc::new(SimulatedSpeechEngine::new());
    let adapter = adapter_over(&engine);
    assert!(adapter.initialize().await);

    adapter.speak("The quick fox", None).unwrap();
    adapter.set_speech_rate(SpeechRate::clamped(2.0));
    assert_eq!(adapter.total_duration().borrow().as_millis(), 1200);

    adapter.speak("The quick fox", None).unwrap();
    assert_eq!(adapter.total_duration().borrow().as_millis(), 600);
}

#[tokio::test]
async fn test_progress_follows_callbacks() {
    let engine = Arc::new(SimulatedSpeechEngine::new());
    let adapter = adapter_over(&engine);
    assert!(adapter.initialize().await);
    let text = "x".repeat(200);

    adapter.speak(&text, None).unwrap();
    engine.emit(UTTERANCE_ID, UtteranceEvent::Start);
    engine.emit(UTTERANCE_ID, UtteranceEvent::Range { start: 50, end: 60 });
    assert_eq!(*adapter.progress().borrow(), 0.25);
    assert_eq!(adapter.status().borrow().status, SpeechStatus::Speaking);

    engine.emit(UTTERANCE_ID, UtteranceEvent::Done);
    assert_eq!(*adapter.progress().borrow(), 1.0);
    assert_eq!(adapter.status().borrow().status, SpeechStatus::Completed);
}

#[tokio::test]
async fn test_empty_text_range_does_not_divide_by_zero() {
    let engine = Arc::new(SimulatedSpeechEngine::new());
    let adapter = adapter_over(&engine);
    assert!(adapter.initialize().await);

    adapter.speak("", None).unwrap();
    engine.emit(UTTERANCE_ID, UtteranceEvent::Range { start: 50, end: 60 });

    assert_eq!(*adapter.progress().borrow(), 0.0);
    assert!(adapter.total_duration().borrow().is_zero());
}

#[tokio::test]
async fn test_error_callback_resets_and_reports_failure() {
    let engine = Arc::new(SimulatedSpeechEngine::new());
    let adapter = adapter_over(&engine);
    assert!(adapter.initialize().await);

    adapter.speak("abcd", None).unwrap();
    engine.emit(UTTERANCE_ID, UtteranceEvent::Range { start: 2, end: 3 });
    engine.emit(
        UTTERANCE_ID,
        UtteranceEvent::Error {
            message: "synthesis error".to_string(),
        },
    );

    assert_eq!(*adapter.progress().borrow(), 0.0);
    assert!(matches!(adapter.status().borrow().status, SpeechStatus::Failed { .. }));
}

#[tokio::test]
async fn test_stop_is_idempotent_and_resets_progress() {
    let engine = Arc::new(SimulatedSpeechEngine::new());
    let adapter = adapter_over(&engine);
    assert!(adapter.initialize().await);

    adapter.speak("abcd", None).unwrap();
    engine.emit(UTTERANCE_ID, UtteranceEvent::Range { start: 2, end: 3 });
    adapter.stop();
    adapter.stop();

    assert_eq!(*adapter.progress().borrow(), 0.0);
    assert_eq!(engine.count(|c| *c == EngineCall::Stop), 2);
}

#[tokio::test]
async fn test_shutdown_exactly_once_and_silences_callbacks() {
    let engine = Arc::new(SimulatedSpeechEngine::new());
    let adapter = adapter_over(&engine);
    assert!(adapter.initialize().await);
    adapter.speak("abcd", None).unwrap();
    let mut progress = adapter.progress();
    let _ = progress.borrow_and_update();

    assert!(adapter.shutdown());
    assert!(!adapter.shutdown());
    engine.emit(UTTERANCE_ID, UtteranceEvent::Range { start: 2, end: 3 });
    engine.emit(UTTERANCE_ID, UtteranceEvent::Done);
    drop(adapter);

    assert_eq!(engine.count(|c| *c == EngineCall::Shutdown), 1);
    assert!(!progress.has_changed().unwrap_or(false));
}

#[tokio::test]
async fn test_drop_releases_engine() {
    let engine = Arc::new(SimulatedSpeechEngine::new());
    {
        let adapter = adapter_over(&engine);
        assert!(adapter.initialize().await);
    }
    assert_eq!(engine.count(|c| *c == EngineCall::Shutdown), 1);
}

#[tokio::test(start_paused = true)]
async fn test_simulated_playback_completes() {
    let engine = Arc::new(SimulatedSpeechEngine::new().with_playback(Duration::from_millis(50)));
    let adapter = adapter_over(&engine);
    assert!(adapter.initialize().await);
    let mut status = adapter.status();

    adapter.speak("The quick fox", None).unwrap();
    status.wait_for(|s| s.status == SpeechStatus::Completed).await.unwrap();

    assert_eq!(*adapter.progress().borrow(), 1.0);
}
