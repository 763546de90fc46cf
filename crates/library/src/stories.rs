//! Story catalog access

use audiostories_core::{AppError, Result, Story, StoryId};
use audiostories_database::{Backend, Document, STORIES};
use audiostories_resilience::{retry_async, RetryPolicy};
use futures::stream::{self, BoxStream, StreamExt};
use std::time::Duration;

/// Attempts made by `fetch_by_id` before giving up
pub const FETCH_ATTEMPTS: usize = 3;

/// Reads stories from the `stories` collection
#[derive(Debug, Clone)]
pub struct StoryStore {
    backend: Backend,
    retry: RetryPolicy,
}

impl StoryStore {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            retry: RetryPolicy::new(FETCH_ATTEMPTS).with_initial_delay(Duration::from_millis(100)),
        }
    }

    /// Replaces the retry policy used by `fetch_by_id`
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// One-shot stream yielding the whole catalog once.
    ///
    /// A failed read yields an empty list; the error is only logged. Use
    /// `try_fetch_all` to tell a failure apart from an empty catalog.
    pub fn fetch_all(&self) -> BoxStream<'static, Vec<Story>> {
        let store = self.clone();
        stream::once(async move {
            match store.try_fetch_all().await {
                Ok(stories) => stories,
                Err(e) => {
                    log::error!("Error fetching stories: {}", e);
                    Vec::new()
                }
            }
        })
        .boxed()
    }

    /// Reads the whole catalog, surfacing failures.
    ///
    /// Documents that do not map onto a story are skipped.
    pub async fn try_fetch_all(&self) -> Result<Vec<Story>> {
        let documents = self.backend.documents().list(STORIES).await?;
        let stories = documents
            .iter()
            .filter_map(|doc| match story_from(doc) {
                Ok(story) => Some(story),
                Err(e) => {
                    log::warn!("Skipping story document {}: {}", doc.id, e);
                    None
                }
            })
            .collect();
        Ok(stories)
    }

    /// Fetches one story, `None` if it does not exist.
    ///
    /// Any failure is retried; the error of the last attempt is returned once
    /// the attempts are used up.
    pub async fn fetch_by_id(&self, id: &str) -> Result<Option<Story>> {
        let result = retry_async(&self.retry, || async {
            let document = self.backend.documents().get(STORIES, id).await?;
            document.as_ref().map(story_from).transpose()
        })
        .await;

        if let Err(e) = &result {
            log::error!("Giving up on story {}: {}", id, e);
        }
        result
    }

    /// Stores a story under its id
    pub async fn save(&self, story: &Story) -> Result<()> {
        if story.id.is_empty() {
            return Err(AppError::InvalidArgument {
                argument: "story.id".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        let data = serde_json::to_value(story)?;
        self.backend
            .documents()
            .set(STORIES, story.id.as_str(), data)
            .await?;
        Ok(())
    }
}

/// Stories written without an `id` field take the document id
fn story_from(document: &Document) -> Result<Story> {
    let mut story: Story = document.decode("Story")?;
    if story.id.is_empty() {
        story.id = StoryId::new(document.id.as_str());
    }
    Ok(story)
}
