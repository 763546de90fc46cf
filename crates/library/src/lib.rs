//! Audio Stories data access
//!
//! Story catalog reads, play statistics writes and account handling, all
//! running on an injected `Backend`.

pub mod accounts;
pub mod ranking;
pub mod stats;
pub mod stories;

pub use accounts::AccountManager;
pub use ranking::{rank, rank_with_titles};
pub use stats::{StatsStore, LAST_LISTENED_FIELD, STORY_STATS_FIELD};
pub use stories::{StoryStore, FETCH_ATTEMPTS};
