//! Story catalog listing

use audiostories_core::Story;
use audiostories_library::StoryStore;
use futures::StreamExt;
use tokio::sync::watch;

/// Shown when a strict catalog load fails
pub const CATALOG_FAILED_MESSAGE: &str = "Failed to load stories.";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogState {
    pub stories: Vec<Story>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

/// Keeps the latest story list for the catalog screen
#[derive(Debug)]
pub struct CatalogView {
    stories: StoryStore,
    state: watch::Sender<CatalogState>,
}

impl CatalogView {
    pub fn new(stories: StoryStore) -> Self {
        Self {
            stories,
            state: watch::Sender::new(CatalogState::default()),
        }
    }

    pub fn state(&self) -> watch::Receiver<CatalogState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> CatalogState {
        self.state.borrow().clone()
    }

    /// Consumes the catalog stream; a failed read shows an empty catalog
    pub async fn load(&self) {
        self.state.send_modify(|s| s.is_loading = true);

        let mut batches = self.stories.fetch_all();
        while let Some(stories) = batches.next().await {
            log::debug!("Catalog received {} stories", stories.len());
            self.state.send_modify(|s| {
                s.stories = stories;
                s.error_message = None;
            });
        }

        self.state.send_modify(|s| s.is_loading = false);
    }

    /// Like `load`, but keeps the previous list and reports a failed read
    pub async fn load_strict(&self) {
        self.state.send_modify(|s| s.is_loading = true);

        match self.stories.try_fetch_all().await {
            Ok(stories) => self.state.send_modify(|s| {
                s.stories = stories;
                s.error_message = None;
                s.is_loading = false;
            }),
            Err(e) => {
                log::error!("Failed to load catalog: {}", e);
                self.state.send_modify(|s| {
                    s.error_message = Some(CATALOG_FAILED_MESSAGE.to_string());
                    s.is_loading = false;
                });
            }
        }
    }
}
