//! In-memory story repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tessera_core::{Story, StoryUpdate};
use tessera_error::{StorageError, StorageErrorKind, TesseraResult};
use tessera_interface::StoryRepository;
use tokio::sync::RwLock;

/// Story repository backed by a shared `HashMap`.
///
/// All data is lost when the last clone is dropped.
///
/// # Example
/// ```
/// use tessera_core::{Story, StoryStatus, StoryUpdate};
/// use tessera_interface::StoryRepository;
/// use tessera_storage::InMemoryStoryRepository;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let repo = InMemoryStoryRepository::new();
/// let story = Story::builder()
///     .id("story-1")
///     .theme("Rainy nights")
///     .initiator_id("a1")
///     .initiator_name("Ada")
///     .build()?;
/// repo.create(story).await?;
/// repo.update("story-1", StoryUpdate::default().with_status(StoryStatus::Extracting)).await?;
/// let stored = repo.get("story-1").await?.unwrap();
/// assert_eq!(*stored.status(), StoryStatus::Extracting);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStoryRepository {
    stories: Arc<RwLock<HashMap<String, Story>>>,
}

impl InMemoryStoryRepository {
    /// Create a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored stories.
    pub async fn len(&self) -> usize {
        self.stories.read().await.len()
    }

    /// Whether the repository holds no stories.
    pub async fn is_empty(&self) -> bool {
        self.stories.read().await.is_empty()
    }
}

#[async_trait]
impl StoryRepository for InMemoryStoryRepository {
    async fn create(&self, story: Story) -> TesseraResult<()> {
        let mut stories = self.stories.write().await;
        if stories.contains_key(story.id()) {
            return Err(
                StorageError::new(StorageErrorKind::AlreadyExists(story.id().clone())).into(),
            );
        }
        tracing::debug!(story_id = %story.id(), "Story created");
        stories.insert(story.id().clone(), story);
        Ok(())
    }

    async fn update(&self, id: &str, update: StoryUpdate) -> TesseraResult<()> {
        let mut stories = self.stories.write().await;
        match stories.get_mut(id) {
            Some(story) => {
                let requested = update.status;
                if !story.apply(update) {
                    tracing::warn!(
                        story_id = id,
                        current = %story.status(),
                        requested = ?requested,
                        "Ignoring backward status update"
                    );
                }
            }
            None => tracing::debug!(story_id = id, "Update for unknown story ignored"),
        }
        Ok(())
    }

    async fn get(&self, id: &str) -> TesseraResult<Option<Story>> {
        Ok(self.stories.read().await.get(id).cloned())
    }

    async fn list(&self) -> TesseraResult<Vec<Story>> {
        let mut all: Vec<Story> = self.stories.read().await.values().cloned().collect();
        all.sort_by(|a, b| b.created_at().cmp(a.created_at()));
        Ok(all)
    }
}
