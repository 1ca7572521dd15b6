//! Registering an authorized user as an agent and keeping its token fresh.

use crate::SecondMeClient;
use chrono::{DateTime, Duration, Utc};
use tessera_core::{Agent, Credentials};
use tessera_error::{BuilderError, TesseraResult};
use tessera_interface::AgentDirectory;
use tracing::instrument;

/// Credits granted to a first-time agent.
pub const STARTING_CREDITS: u32 = 3;

/// Token lifetime assumed when the service omits `expires_in`.
pub const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 7200;

const MAX_MEMORY_SNIPPETS: usize = 10;
const MAX_TOKEN_LIFETIME_SECS: u64 = 365 * 24 * 3600;
const ANONYMOUS_NAME: &str = "Anonymous";

/// Complete an OAuth login and upsert the resulting agent.
///
/// Exchanges `code`, fetches the profile, then makes best-effort lookups of
/// shades and soft memory (either may fail without failing registration).
/// The agent id is the user's route, else their email, else a generated id.
/// A returning agent keeps its credits and join time.
#[instrument(skip_all)]
pub async fn register_agent(
    client: &SecondMeClient,
    directory: &dyn AgentDirectory,
    code: &str,
) -> TesseraResult<Agent> {
    let grant = client.exchange_code(code).await?;
    let token = grant.access_token().as_str();
    let info = client.user_info(token).await?;

    let shades: Vec<String> = match client.user_shades(token).await {
        Ok(shades) => shades
            .iter()
            .filter_map(|shade| shade.label().map(str::to_string))
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "Shades unavailable, continuing without");
            Vec::new()
        }
    };

    let memory_snippets: Vec<String> = match client.user_soft_memory(token).await {
        Ok(memories) => memories
            .into_iter()
            .map(|memory| memory.content().clone())
            .filter(|content| !content.trim().is_empty())
            .take(MAX_MEMORY_SNIPPETS)
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "Soft memory unavailable, continuing without");
            Vec::new()
        }
    };

    let id = [info.route(), info.email()]
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| format!("agent-{}", uuid::Uuid::new_v4().simple()));

    let existing = directory.get(&id).await?;
    let now = Utc::now();
    let expires_at = token_expiry(now, *grant.expires_in());

    let agent = Agent::builder()
        .id(id.clone())
        .name(
            info.name()
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| ANONYMOUS_NAME.to_string()),
        )
        .avatar_url(info.avatar_url().clone().unwrap_or_default())
        .credentials(Credentials::new(
            grant.access_token().clone(),
            grant.refresh_token().clone(),
            expires_at,
        ))
        .shades(shades)
        .memory_snippets(memory_snippets)
        .credits(
            existing
                .as_ref()
                .map(|agent| *agent.credits())
                .unwrap_or(STARTING_CREDITS),
        )
        .joined_at(existing.as_ref().map(|agent| *agent.joined_at()).unwrap_or(now))
        .build()
        .map_err(|e| BuilderError::from(e.to_string()))?;

    tracing::info!(
        agent_id = %id,
        returning = existing.is_some(),
        shades = agent.shades().len(),
        memories = agent.memory_snippets().len(),
        "Agent registered"
    );
    directory.upsert(agent.clone()).await?;
    Ok(agent)
}

/// Refresh `agent`'s access token if it has expired at `now`.
///
/// An agent whose token is still valid comes back unchanged without touching
/// the service. When the grant carries no refresh token the old one is kept.
#[instrument(skip_all, fields(agent_id = %agent.id()))]
pub async fn refresh_if_expired(
    client: &SecondMeClient,
    agent: Agent,
    now: DateTime<Utc>,
) -> TesseraResult<Agent> {
    if !agent.credentials().is_expired_at(now) {
        return Ok(agent);
    }

    let grant = client
        .refresh_access_token(agent.credentials().refresh_token())
        .await?;
    let refresh_token = if grant.refresh_token().is_empty() {
        agent.credentials().refresh_token().clone()
    } else {
        grant.refresh_token().clone()
    };
    let expires_at = token_expiry(now, *grant.expires_in());
    tracing::info!(expires_at = %expires_at, "Agent token refreshed");
    Ok(agent.with_credentials(Credentials::new(
        grant.access_token().clone(),
        refresh_token,
        expires_at,
    )))
}

fn token_expiry(now: DateTime<Utc>, expires_in: Option<u64>) -> DateTime<Utc> {
    let lifetime = expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
    now + Duration::seconds(lifetime.min(MAX_TOKEN_LIFETIME_SECS) as i64)
}
