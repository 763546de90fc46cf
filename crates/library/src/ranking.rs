//! Favorite stories ranking with titles resolved from the catalog

use crate::stories::StoryStore;
use audiostories_core::{RankedStory, UserStats};
use futures::future::join_all;

/// Ranking rows without titles
pub fn rank(stats: &UserStats) -> Vec<RankedStory> {
    stats
        .ranking()
        .into_iter()
        .enumerate()
        .map(|(index, (story_id, count))| RankedStory::new(index + 1, story_id, count))
        .collect()
}

/// Ranking rows with titles looked up concurrently.
///
/// A story that is gone or fails to load keeps `title: None`.
pub async fn rank_with_titles(stories: &StoryStore, stats: &UserStats) -> Vec<RankedStory> {
    let rows = rank(stats);
    let titles = join_all(rows.iter().map(|row| async move {
        match stories.fetch_by_id(row.story_id.as_str()).await {
            Ok(story) => story.map(|s| s.title),
            Err(e) => {
                log::warn!("Could not resolve title of {}: {}", row.story_id, e);
                None
            }
        }
    }))
    .await;

    rows.into_iter()
        .zip(titles)
        .map(|(row, title)| RankedStory { title, ..row })
        .collect()
}
