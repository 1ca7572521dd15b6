use chrono::{Duration, Utc};
use tessera_core::{Agent, Credentials, Story, StoryStatus, StoryUpdate};
use tessera_error::{StorageErrorKind, TesseraErrorKind};
use tessera_interface::{AgentDirectory, StoryRepository};
use tessera_storage::{InMemoryAgentDirectory, InMemoryStoryRepository};

fn story(id: &str) -> anyhow::Result<Story> {
    Ok(Story::builder()
        .id(id)
        .theme("Night markets")
        .initiator_id("a1")
        .initiator_name("Ada")
        .build()?)
}

fn agent(id: &str, credits: u32) -> anyhow::Result<Agent> {
    Ok(Agent::builder()
        .id(id)
        .name(format!("Agent {id}"))
        .credentials(Credentials::new("t", "r", Utc::now() + Duration::hours(1)))
        .credits(credits)
        .build()?)
}

#[tokio::test]
async fn test_create_rejects_duplicate_id() -> anyhow::Result<()> {
    let repo = InMemoryStoryRepository::new();
    repo.create(story("s1")?).await?;

    let err = repo.create(story("s1")?).await.unwrap_err();
    match err.kind() {
        TesseraErrorKind::Storage(e) => {
            assert!(matches!(e.kind, StorageErrorKind::AlreadyExists(_)))
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(repo.len().await, 1);
    Ok(())
}

#[tokio::test]
async fn test_update_unknown_id_is_noop() -> anyhow::Result<()> {
    let repo = InMemoryStoryRepository::new();
    repo.update("missing", StoryUpdate::completed("done")).await?;
    assert!(repo.get("missing").await?.is_none());
    assert!(repo.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn test_update_merges_only_given_fields() -> anyhow::Result<()> {
    let repo = InMemoryStoryRepository::new();
    repo.create(story("s1")?).await?;
    repo.update("s1", StoryUpdate::default().with_status(StoryStatus::Weaving))
        .await?;

    let stored = repo.get("s1").await?.expect("story exists");
    assert_eq!(*stored.status(), StoryStatus::Weaving);
    assert_eq!(stored.theme(), "Night markets");
    assert!(stored.final_narrative().is_none());
    Ok(())
}

#[tokio::test]
async fn test_update_never_regresses_status() -> anyhow::Result<()> {
    let repo = InMemoryStoryRepository::new();
    repo.create(story("s1")?).await?;
    repo.update("s1", StoryUpdate::completed("fin")).await?;
    repo.update("s1", StoryUpdate::default().with_status(StoryStatus::Extracting))
        .await?;

    let stored = repo.get("s1").await?.expect("story exists");
    assert_eq!(*stored.status(), StoryStatus::Completed);
    Ok(())
}

#[tokio::test]
async fn test_list_is_newest_first() -> anyhow::Result<()> {
    let repo = InMemoryStoryRepository::new();
    let older = Story::builder()
        .id("old")
        .theme("t")
        .initiator_id("a")
        .initiator_name("A")
        .created_at(Utc::now() - Duration::minutes(5))
        .build()?;
    repo.create(older).await?;
    repo.create(story("new")?).await?;

    let ids: Vec<String> = repo.list().await?.iter().map(|s| s.id().clone()).collect();
    assert_eq!(ids, vec!["new".to_string(), "old".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_clones_share_state() -> anyhow::Result<()> {
    let repo = InMemoryStoryRepository::new();
    let other = repo.clone();
    repo.create(story("s1")?).await?;
    assert!(other.get("s1").await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_directory_upsert_replaces() -> anyhow::Result<()> {
    let directory = InMemoryAgentDirectory::new();
    directory.upsert(agent("a1", 3)?).await?;
    directory.upsert(agent("a1", 7)?).await?;

    assert_eq!(directory.len().await, 1);
    let stored = directory.get("a1").await?.expect("agent exists");
    assert_eq!(*stored.credits(), 7);
    Ok(())
}

#[tokio::test]
async fn test_directory_with_agents() -> anyhow::Result<()> {
    let directory = InMemoryAgentDirectory::with_agents(vec![agent("a1", 1)?, agent("a2", 1)?]);
    assert_eq!(directory.list_all().await?.len(), 2);
    assert!(directory.get("a3").await?.is_none());
    Ok(())
}
