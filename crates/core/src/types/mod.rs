//! Domain types for Audio Stories
//!
//! - `story`: Catalog entries and image link normalisation
//! - `user`: Profiles, play statistics and the ranking built from them
//! - `session`: Authenticated user context
//! - `speech`: Speech rate and voice catalog entries
//! - `common`: Timestamps and durations

mod common;
mod session;
mod speech;
mod story;
mod user;

pub use common::{Duration, Timestamp};
pub use session::Session;
pub use speech::{SpeechRate, Voice};
pub use story::{direct_image_url, Story, StoryId};
pub use user::{Medal, RankedStory, User, UserStats};
