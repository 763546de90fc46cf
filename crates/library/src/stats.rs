//! Per-user play statistics

use audiostories_core::{AppError, Result, Session, StoryId};
use audiostories_database::{field_path, run_transaction, Backend, USERS};
use serde_json::Value;
use std::collections::BTreeMap;

/// Field holding the story id to play count map
pub const STORY_STATS_FIELD: &str = "stats.storyStats";

/// Field holding the last listened story id
pub const LAST_LISTENED_FIELD: &str = "stats.lastListenedStoryId";

/// Writes play counts and the last listened pointer into `users/{uid}`
#[derive(Debug, Clone)]
pub struct StatsStore {
    backend: Backend,
}

impl StatsStore {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    fn session(&self, operation: &str) -> Result<Session> {
        self.backend
            .auth()
            .current_session()
            .ok_or_else(|| AppError::unauthenticated(operation))
    }

    /// Adds one play of `story_id` for the signed-in user and returns the new count.
    ///
    /// Runs as an optimistic transaction, so concurrent increments never lose
    /// an update.
    pub async fn increment_play_count(&self, story_id: &StoryId) -> Result<u64> {
        let session = self.session("update story stats")?;

        run_transaction(
            self.backend.documents(),
            USERS,
            &session.uid,
            self.backend.transaction_attempts(),
            |body| {
                let mut counts: BTreeMap<StoryId, u64> = match field_path::get(body, STORY_STATS_FIELD)
                {
                    None | Some(Value::Null) => BTreeMap::new(),
                    Some(value) => serde_json::from_value(value.clone())?,
                };

                let count = counts.entry(story_id.clone()).or_insert(0);
                *count += 1;
                let count = *count;

                field_path::set(body, STORY_STATS_FIELD, serde_json::to_value(&counts)?)?;
                Ok(count)
            },
        )
        .await
    }

    /// Points the signed-in user's last listened story at `story_id`
    pub async fn set_last_listened(&self, story_id: &StoryId) -> Result<()> {
        let session = self.session("update last listened story")?;

        self.backend
            .documents()
            .update_field(
                USERS,
                &session.uid,
                LAST_LISTENED_FIELD,
                Value::String(story_id.to_string()),
            )
            .await
    }

    /// Increments the play count, then moves the last listened pointer.
    ///
    /// The two writes are independent: if the second fails the count stays
    /// incremented.
    pub async fn record_play(&self, story_id: &StoryId) -> Result<u64> {
        let count = self.increment_play_count(story_id).await?;
        self.set_last_listened(story_id).await?;
        log::debug!("Recorded play {} of story {}", count, story_id);
        Ok(count)
    }
}
