//! Storage traits for stories and agents.

use async_trait::async_trait;
use tessera_core::{Agent, Story, StoryUpdate};
use tessera_error::TesseraResult;

/// Mapping from story id to mutable story state.
///
/// The orchestrator's only way to publish progress. Writes are whole-field
/// replacements; last write wins.
#[async_trait]
pub trait StoryRepository: Send + Sync {
    /// Insert a new story. Fails if the id already exists.
    async fn create(&self, story: Story) -> TesseraResult<()>;

    /// Merge `update` into the stored story. No-op if the id is absent.
    async fn update(&self, id: &str, update: StoryUpdate) -> TesseraResult<()>;

    /// Fetch the full record, or `None` if the id is unknown.
    async fn get(&self, id: &str) -> TesseraResult<Option<Story>>;

    /// All stories, newest first.
    async fn list(&self) -> TesseraResult<Vec<Story>>;
}

/// Mapping from agent id to agent record.
#[async_trait]
pub trait AgentDirectory: Send + Sync {
    /// Fetch an agent, or `None` if the id is unknown.
    async fn get(&self, id: &str) -> TesseraResult<Option<Agent>>;

    /// Insert or replace an agent keyed by its id.
    async fn upsert(&self, agent: Agent) -> TesseraResult<()>;

    /// Every agent, in no particular order.
    async fn list_all(&self) -> TesseraResult<Vec<Agent>>;
}
