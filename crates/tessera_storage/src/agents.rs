//! In-memory agent directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tessera_core::Agent;
use tessera_error::TesseraResult;
use tessera_interface::AgentDirectory;
use tokio::sync::RwLock;

/// Agent directory backed by a shared `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgentDirectory {
    agents: Arc<RwLock<HashMap<String, Agent>>>,
}

impl InMemoryAgentDirectory {
    /// Create a new empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory pre-populated with `agents`.
    pub fn with_agents(agents: impl IntoIterator<Item = Agent>) -> Self {
        let map = agents
            .into_iter()
            .map(|agent| (agent.id().clone(), agent))
            .collect();
        Self {
            agents: Arc::new(RwLock::new(map)),
        }
    }

    /// Number of registered agents.
    pub async fn len(&self) -> usize {
        self.agents.read().await.len()
    }

    /// Whether the directory is empty.
    pub async fn is_empty(&self) -> bool {
        self.agents.read().await.is_empty()
    }
}

#[async_trait]
impl AgentDirectory for InMemoryAgentDirectory {
    async fn get(&self, id: &str) -> TesseraResult<Option<Agent>> {
        Ok(self.agents.read().await.get(id).cloned())
    }

    async fn upsert(&self, agent: Agent) -> TesseraResult<()> {
        tracing::debug!(agent_id = %agent.id(), "Agent upserted");
        self.agents.write().await.insert(agent.id().clone(), agent);
        Ok(())
    }

    async fn list_all(&self) -> TesseraResult<Vec<Agent>> {
        Ok(self.agents.read().await.values().cloned().collect())
    }
}
