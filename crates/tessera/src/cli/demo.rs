//! `tessera demo`: an elastic story answered from presets.

use super::commands::DemoArgs;
use super::watch::{print_story, run_watched};
use std::sync::Arc;
use std::time::Duration;
use tessera::{
    BuilderError, DemoRoster, ElasticRequest, InMemoryAgentDirectory, InMemoryStoryRepository,
    NarrativeOrchestrator, PresetInvoker, StoryRepository, TesseraConfig, TesseraResult,
    create_elastic_story,
};
use tracing::{info, instrument};

/// Create and run an elastic story offline, then print it.
#[instrument(skip_all, fields(theme = %args.theme, real = args.real))]
pub async fn run_demo(config: &TesseraConfig, args: DemoArgs) -> TesseraResult<()> {
    let roster = Arc::new(match &args.roster {
        Some(path) => DemoRoster::from_file(path)?,
        None => DemoRoster::bundled()?,
    });
    let stories = InMemoryStoryRepository::new();
    let agents = InMemoryAgentDirectory::new();

    let request = ElasticRequest::builder()
        .theme(args.theme.clone())
        .description(args.description.clone())
        .real_agent_count(args.real)
        .build()
        .map_err(|e| BuilderError::from(e.to_string()))?;
    let story_id = create_elastic_story(&stories, &agents, &roster, &request).await?;

    let invoker =
        PresetInvoker::new(roster.clone()).with_latency(Duration::from_millis(args.latency_ms));
    let orchestrator = NarrativeOrchestrator::new(
        Arc::new(stories.clone()),
        Arc::new(agents),
        Arc::new(invoker),
    )
    .with_config(config.narrative().clone())
    .with_roster(roster);

    info!(story_id = %story_id, "Running demo story");
    let repository: Arc<dyn StoryRepository> = Arc::new(stories);
    let story = run_watched(repository, &story_id, orchestrator.run(&story_id)).await?;
    print_story(&story, args.json)
}
