//! Story repository that records every update it is asked to store.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tessera_core::{Story, StoryStatus, StoryUpdate};
use tessera_error::TesseraResult;
use tessera_interface::StoryRepository;
use tessera_storage::InMemoryStoryRepository;

#[derive(Clone, Default)]
pub struct RecordingRepository {
    inner: InMemoryStoryRepository,
    writes: Arc<Mutex<Vec<Write>>>,
}

/// What one update carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Write {
    pub status: Option<StoryStatus>,
    pub fragments: Option<usize>,
}

impl RecordingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statuses carried by updates, in order.
    pub fn statuses(&self) -> Vec<StoryStatus> {
        self.writes().iter().filter_map(|w| w.status).collect()
    }

    /// Every update received, in order.
    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }

    /// Fragment counts of the snapshots published while the story sat in
    /// `status`, excluding the transition update itself.
    pub fn snapshots_during(&self, status: StoryStatus) -> Vec<usize> {
        let mut current = None;
        let mut counts = Vec::new();
        for write in self.writes() {
            if write.status.is_some() {
                current = write.status;
                continue;
            }
            if current == Some(status) {
                counts.extend(write.fragments);
            }
        }
        counts
    }
}

#[async_trait]
impl StoryRepository for RecordingRepository {
    async fn create(&self, story: Story) -> TesseraResult<()> {
        self.inner.create(story).await
    }

    async fn update(&self, id: &str, update: StoryUpdate) -> TesseraResult<()> {
        self.writes.lock().unwrap().push(Write {
            status: update.status,
            fragments: update.fragments.as_ref().map(Vec::len),
        });
        self.inner.update(id, update).await
    }

    async fn get(&self, id: &str) -> TesseraResult<Option<Story>> {
        self.inner.get(id).await
    }

    async fn list(&self) -> TesseraResult<Vec<Story>> {
        self.inner.list().await
    }
}
