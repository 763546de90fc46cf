//! Audio Stories playback screens
//!
//! `PlaybackCoordinator` runs a single story screen: it loads the story,
//! prepares speech, plays and stops, and records plays in the background.
//! `CatalogView` and `StatsView` back the catalog and profile screens.

pub mod catalog;
pub mod coordinator;
pub mod state;
pub mod stats_view;

pub use catalog::{CatalogState, CatalogView, CATALOG_FAILED_MESSAGE};
pub use coordinator::PlaybackCoordinator;
pub use state::{
    LoadPhase, PlaybackStatus, ScreenState, LOAD_FAILED_MESSAGE, NOT_FOUND_MESSAGE,
    PLAYBACK_FAILED_MESSAGE,
};
pub use stats_view::{StatsState, StatsView};
