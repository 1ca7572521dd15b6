//! The offline demo pipeline through the facade crate.

use std::sync::Arc;
use std::time::Duration;
use tessera::{
    DemoRoster, ElasticRequest, InMemoryAgentDirectory, InMemoryStoryRepository,
    NarrativeOrchestrator, PresetInvoker, StoryRepository, StoryStatus, TesseraConfig,
    create_elastic_story,
};

#[tokio::test]
async fn test_demo_story_completes_with_every_piece() -> anyhow::Result<()> {
    let roster = Arc::new(DemoRoster::bundled()?);
    let stories = InMemoryStoryRepository::new();
    let agents = InMemoryAgentDirectory::new();
    let request = ElasticRequest::builder()
        .theme("Rainy season")
        .real_agent_count(5usize)
        .build()?;
    let id = create_elastic_story(&stories, &agents, &roster, &request).await?;

    let invoker = PresetInvoker::new(roster.clone()).with_latency(Duration::from_millis(5));
    NarrativeOrchestrator::new(Arc::new(stories.clone()), Arc::new(agents), Arc::new(invoker))
        .with_config(TesseraConfig::default().narrative().clone())
        .with_roster(roster.clone())
        .run(&id)
        .await?;

    let story = stories.get(&id).await?.unwrap();
    assert_eq!(*story.status(), StoryStatus::Completed);
    assert_eq!(story.fragments().len(), roster.len());
    assert!(story.fragments().iter().all(|f| !*f.is_ai_generated()));
    let narrative = story.final_narrative().as_deref().unwrap_or_default();
    assert!(narrative.contains("completion 100%"));
    Ok(())
}
