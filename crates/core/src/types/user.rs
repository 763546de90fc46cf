//! User profile and listening statistics

use crate::types::StoryId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A user profile document
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    pub name: Option<String>,
    pub email: String,
    pub profile_image_url: Option<String>,
    pub stats: Option<UserStats>,
}

impl User {
    /// Creates a freshly registered user with empty statistics
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: email.into(),
            profile_image_url: None,
            stats: Some(UserStats::default()),
        }
    }

    /// Returns the stats, or an empty set when the profile has none yet
    pub fn stats_or_default(&self) -> UserStats {
        self.stats.clone().unwrap_or_default()
    }
}

/// Per-story play counts and the last listened pointer.
///
/// Play counts only ever grow; a story absent from the map has been played zero times.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserStats {
    pub story_stats: BTreeMap<StoryId, u64>,
    pub last_listened_story_id: Option<StoryId>,
}

impl UserStats {
    /// Returns how many times a story was played
    pub fn play_count(&self, story_id: &str) -> u64 {
        self.story_stats.get(story_id).copied().unwrap_or(0)
    }

    /// Adds one play for the story and returns the new count
    pub fn increment(&mut self, story_id: &StoryId) -> u64 {
        let count = self.story_stats.entry(story_id.clone()).or_insert(0);
        *count += 1;
        *count
    }

    /// Total plays across every story
    pub fn total_plays(&self) -> u64 {
        self.story_stats.values().sum()
    }

    /// Returns true if the user has played anything
    pub fn has_history(&self) -> bool {
        self.total_plays() > 0
    }

    /// Stories ordered by play count, most played first.
    ///
    /// Ties are broken by story id so the ordering is stable.
    pub fn ranking(&self) -> Vec<(StoryId, u64)> {
        let mut entries: Vec<(StoryId, u64)> = self
            .story_stats
            .iter()
            .map(|(id, count)| (id.clone(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }
}

/// Medal shown next to the top three entries of the ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    /// Returns the medal for a 1-based rank, if any
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(Self::Gold),
            2 => Some(Self::Silver),
            3 => Some(Self::Bronze),
            _ => None,
        }
    }
}

impl fmt::Display for Medal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gold => write!(f, "gold"),
            Self::Silver => write!(f, "silver"),
            Self::Bronze => write!(f, "bronze"),
        }
    }
}

/// One row of the "favorite stories" ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedStory {
    /// 1-based position
    pub rank: usize,
    pub medal: Option<Medal>,
    pub story_id: StoryId,
    /// Story title, `None` while unresolved or when the story no longer exists
    pub title: Option<String>,
    pub play_count: u64,
}

impl RankedStory {
    /// Builds a ranking row without a resolved title
    pub fn new(rank: usize, story_id: StoryId, play_count: u64) -> Self {
        Self {
            rank,
            medal: Medal::for_rank(rank),
            story_id,
            title: None,
            play_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_with(entries: &[(&str, u64)]) -> UserStats {
        let mut stats = UserStats::default();
        for (id, count) in entries {
            stats.story_stats.insert(StoryId::new(*id), *count);
        }
        stats
    }

    #[test]
    fn test_play_count_defaults_to_zero() {
        let stats = UserStats::default();
        assert_eq!(stats.play_count("missing"), 0);
        assert!(!stats.has_history());
    }

    #[test]
    fn test_increment_initializes_and_grows() {
        let mut stats = UserStats::default();
        let id = StoryId::new("s1");
        assert_eq!(stats.increment(&id), 1);
        assert_eq!(stats.increment(&id), 2);
        assert_eq!(stats.play_count("s1"), 2);
        assert_eq!(stats.total_plays(), 2);
    }

    #[test]
    fn test_ranking_sorted_descending_with_stable_ties() {
        let stats = stats_with(&[("b", 3), ("a", 3), ("c", 7), ("d", 1)]);
        let ranking = stats.ranking();
        let ids: Vec<&str> = ranking.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_medals_for_top_three_only() {
        assert_eq!(Medal::for_rank(1), Some(Medal::Gold));
        assert_eq!(Medal::for_rank(2), Some(Medal::Silver));
        assert_eq!(Medal::for_rank(3), Some(Medal::Bronze));
        assert_eq!(Medal::for_rank(4), None);
        assert_eq!(RankedStory::new(4, StoryId::new("x"), 1).medal, None);
    }

    #[test]
    fn test_stats_document_field_names() {
        let mut stats = stats_with(&[("s1", 2)]);
        stats.last_listened_story_id = Some(StoryId::new("s1"));
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["storyStats"]["s1"], 2);
        assert_eq!(json["lastListenedStoryId"], "s1");
    }

    #[test]
    fn test_new_user_has_empty_stats() {
        let user = User::new("Ada", "ada@example.com");
        assert_eq!(user.stats, Some(UserStats::default()));
        let json = serde_json::to_value(&user).unwrap();
        assert!(json["profileImageUrl"].is_null());
        assert!(json["stats"]["lastListenedStoryId"].is_null());
    }

    #[test]
    fn test_user_without_stats_yields_default() {
        let user: User = serde_json::from_value(serde_json::json!({"email": "a@b.c"})).unwrap();
        assert!(user.stats.is_none());
        assert_eq!(user.stats_or_default(), UserStats::default());
    }
}
