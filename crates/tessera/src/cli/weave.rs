//! `tessera weave`: a story with live agents.

use super::commands::WeaveArgs;
use super::watch::{print_story, run_watched};
use std::sync::Arc;
use chrono::Utc;
use tessera::{
    Agent, BuilderError, InMemoryAgentDirectory, InMemoryStoryRepository, NarrativeOrchestrator,
    OAuthApp, SecondMeClient, Story, StoryRepository, TesseraConfig, TesseraResult, load_agents,
    match_agents_for_theme, refresh_if_expired, save_agents,
};
use tracing::{info, instrument, warn};

/// Match participants for the theme and run the full pipeline.
#[instrument(skip_all, fields(theme = %args.theme))]
pub async fn weave(config: &TesseraConfig, args: WeaveArgs) -> TesseraResult<()> {
    let client = SecondMeClient::new(config.client().clone().with_env_overrides())?;
    let client = match OAuthApp::from_env() {
        Ok(oauth) => client.with_oauth(oauth),
        Err(e) => {
            warn!(error = %e, "No OAuth app configured, expired tokens cannot be refreshed");
            client
        }
    };

    let mut pool = load_agents(&args.agents)?;
    let max = args.max.unwrap_or(*config.narrative().max_participants());
    let cast = match_agents_for_theme(&pool, &args.theme, &args.description, &args.initiator, max);
    if cast.is_empty() {
        warn!(pool = pool.len(), "No agents matched; the story will complete empty");
    }
    info!(
        participants = ?cast.iter().map(|a| a.id().as_str()).collect::<Vec<_>>(),
        "Matched participants"
    );
    if refresh_expired(&client, &mut pool, &cast).await > 0 {
        save_agents(&args.agents, &pool)?;
    }

    let initiator_name = pool
        .iter()
        .find(|agent| *agent.id() == args.initiator)
        .map(|agent| agent.name().clone())
        .unwrap_or_else(|| "Anonymous".to_string());
    let story = Story::builder()
        .theme(args.theme.clone())
        .description(args.description.clone())
        .initiator_id(args.initiator.clone())
        .initiator_name(initiator_name)
        .participant_ids(cast.iter().map(|a| a.id().clone()).collect::<Vec<_>>())
        .build()
        .map_err(|e| BuilderError::from(e.to_string()))?;
    let story_id = story.id().clone();

    let stories = InMemoryStoryRepository::new();
    stories.create(story).await?;
    let orchestrator = NarrativeOrchestrator::new(
        Arc::new(stories.clone()),
        Arc::new(InMemoryAgentDirectory::with_agents(pool)),
        Arc::new(client),
    )
    .with_config(config.narrative().clone());

    let repository: Arc<dyn StoryRepository> = Arc::new(stories);
    let story = run_watched(repository, &story_id, orchestrator.run(&story_id)).await?;
    print_story(&story, args.json)
}

/// Refresh the expired tokens of `cast` inside `pool`; returns how many changed.
///
/// A failed refresh keeps the stale token, so that agent's calls fail and it
/// drops out of the story like any other failing agent.
async fn refresh_expired(client: &SecondMeClient, pool: &mut [Agent], cast: &[Agent]) -> usize {
    let now = Utc::now();
    let mut refreshed = 0;
    for agent in pool.iter_mut() {
        if !cast.iter().any(|c| c.id() == agent.id()) || !agent.credentials().is_expired_at(now) {
            continue;
        }
        match refresh_if_expired(client, agent.clone(), now).await {
            Ok(fresh) => {
                *agent = fresh;
                refreshed += 1;
            }
            Err(e) => warn!(agent_id = %agent.id(), error = %e, "Token refresh failed"),
        }
    }
    refreshed
}
