//! Demo agent seeding.

use crate::{DemoRoster, PresetInvoker};
use chrono::{Duration, Utc};
use tessera_core::{Agent, Credentials};
use tessera_error::{BuilderError, TesseraResult};
use tessera_interface::AgentDirectory;
use tracing::{info, instrument};

/// Credits each demo agent starts with.
pub const DEMO_CREDITS: u32 = 10;

/// Upsert every roster entry into `agents` as a demo agent.
///
/// Demo agents carry `demo:<id>` tokens valid for a day, so they can be
/// answered by [`PresetInvoker`]. Join dates are staggered one day apart,
/// oldest first. Re-seeding replaces the previous records.
#[instrument(skip_all, fields(roster = roster.len()))]
pub async fn seed_demo_agents(
    agents: &dyn AgentDirectory,
    roster: &DemoRoster,
) -> TesseraResult<Vec<Agent>> {
    let now = Utc::now();
    let mut seeded = Vec::with_capacity(roster.len());

    for (i, entry) in roster.agents().iter().enumerate() {
        let token = PresetInvoker::token_for(entry.id());
        let agent = Agent::builder()
            .id(entry.id().clone())
            .name(entry.name().clone())
            .avatar_url(entry.avatar_url().clone())
            .credentials(Credentials::new(
                token.clone(),
                token,
                now + Duration::days(1),
            ))
            .shades(entry.shades().clone())
            .memory_snippets(entry.memory_snippets().clone())
            .credits(DEMO_CREDITS)
            .joined_at(now - Duration::days(i as i64 + 1))
            .build()
            .map_err(|e| BuilderError::from(e.to_string()))?;
        agents.upsert(agent.clone()).await?;
        seeded.push(agent);
    }

    info!(count = seeded.len(), "Seeded demo agents");
    Ok(seeded)
}
