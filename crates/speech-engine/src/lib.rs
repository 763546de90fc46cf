//! Audio Stories speech synthesis
//!
//! `SpeechAdapter` wraps a platform `SpeechEngine` for one playback screen:
//! it estimates how long a text takes to speak, turns utterance callbacks
//! into a 0.0 - 1.0 progress value and a `SpeechStatus`, and filters the
//! voice catalog down to network-quality voices of the reference locale.
//!
//! `SimulatedSpeechEngine` stands in for the platform engine in tests and in
//! the command line player.

pub mod adapter;
pub mod engine;
pub mod error;
pub mod estimate;
pub mod progress;
pub mod simulated;
pub mod voices;

pub use adapter::SpeechAdapter;
pub use engine::{QueueMode, SpeechEngine, UtteranceEvent, UtteranceListener, UTTERANCE_ID};
pub use error::{SpeechError, SpeechResult};
pub use estimate::{estimate_duration, estimate_duration_with, word_count, BASE_WORDS_PER_MINUTE};
pub use progress::{ProgressTracker, SpeechStatus, UtteranceStatus};
pub use simulated::{EngineCall, SimulatedSpeechEngine};
pub use voices::{VoiceFilter, NETWORK_VOICE_MARKER, REFERENCE_LOCALE};
