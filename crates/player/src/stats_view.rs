//! Profile and favorite stories screen

use audiostories_core::{RankedStory, User};
use audiostories_library::{rank_with_titles, AccountManager, StoryStore};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq)]
pub struct StatsState {
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub profile: Option<User>,
    pub ranking: Vec<RankedStory>,
}

impl Default for StatsState {
    fn default() -> Self {
        Self {
            is_loading: true,
            error_message: None,
            profile: None,
            ranking: Vec::new(),
        }
    }
}

/// Loads the signed-in user's profile and ranks their most played stories
#[derive(Debug)]
pub struct StatsView {
    accounts: AccountManager,
    stories: StoryStore,
    state: watch::Sender<StatsState>,
}

impl StatsView {
    pub fn new(accounts: AccountManager, stories: StoryStore) -> Self {
        Self {
            accounts,
            stories,
            state: watch::Sender::new(StatsState::default()),
        }
    }

    pub fn state(&self) -> watch::Receiver<StatsState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> StatsState {
        self.state.borrow().clone()
    }

    pub async fn load(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error_message = None;
        });

        match self.accounts.fetch_profile().await {
            Ok(profile) => {
                let ranking = match &profile {
                    Some(user) => rank_with_titles(&self.stories, &user.stats_or_default()).await,
                    None => Vec::new(),
                };
                self.state.send_modify(|s| {
                    s.profile = profile;
                    s.ranking = ranking;
                    s.is_loading = false;
                });
            }
            Err(e) => {
                log::warn!("Failed to load profile: {}", e);
                self.state.send_modify(|s| {
                    s.error_message = Some(format!("Failed to load profile: {}", e));
                    s.is_loading = false;
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audiostories_core::{Medal, Story, StoryId};
    use audiostories_database::{Backend, MemoryAuthService, MemoryDocumentStore};
    use audiostories_library::StatsStore;
    use std::sync::Arc;

    fn backend(auth: MemoryAuthService) -> Backend {
        Backend::new(Arc::new(MemoryDocumentStore::new()), Arc::new(auth))
    }

    #[tokio::test]
    async fn test_starts_loading() {
        let backend = Backend::in_memory();
        let view = StatsView::new(AccountManager::new(backend.clone()), StoryStore::new(backend));
        assert!(view.snapshot().is_loading);
    }

    #[tokio::test]
    async fn test_signed_out_is_an_error() {
        let backend = Backend::in_memory();
        let view = StatsView::new(AccountManager::new(backend.clone()), StoryStore::new(backend));

        view.load().await;

        let state = view.snapshot();
        assert!(!state.is_loading);
        assert_eq!(
            state.error_message.as_deref(),
            Some("Failed to load profile: User must be logged in to load the profile")
        );
    }

    #[tokio::test]
    async fn test_ranking_with_titles() {
        let backend = backend(MemoryAuthService::new());
        let accounts = AccountManager::new(backend.clone());
        accounts.register("Ada", "ada@example.com", "secret1").await.unwrap();

        let stories = StoryStore::new(backend.clone());
        stories.save(&Story::new("s1", "Fox", "The quick fox")).await.unwrap();
        stories.save(&Story::new("s2", "Owl", "Hoot")).await.unwrap();

        let stats = StatsStore::new(backend);
        for _ in 0..3 {
            stats.record_play(&StoryId::new("s2")).await.unwrap();
        }
        stats.record_play(&StoryId::new("s1")).await.unwrap();

        let view = StatsView::new(accounts, stories);
        view.load().await;

        let state = view.snapshot();
        assert!(state.error_message.is_none());
        assert_eq!(state.profile.unwrap().name.as_deref(), Some("Ada"));
        let rows: Vec<(usize, Option<&str>, u64, Option<Medal>)> = state
            .ranking
            .iter()
            .map(|r| (r.rank, r.title.as_deref(), r.play_count, r.medal))
            .collect();
        assert_eq!(
            rows,
            vec![
                (1, Some("Owl"), 3, Some(Medal::Gold)),
                (2, Some("Fox"), 1, Some(Medal::Silver)),
            ]
        );
    }
}
