//! Story progress polling.

use std::sync::Arc;
use std::time::Duration;
use tessera::{Story, StoryRepository, TesseraResult};
use tracing::{info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Log each status and fragment count change until the story completes.
pub async fn watch_story(stories: Arc<dyn StoryRepository>, story_id: String) -> TesseraResult<()> {
    let mut last = None;
    loop {
        let Some(story) = stories.get(&story_id).await? else {
            warn!(story_id = %story_id, "Watched story disappeared");
            return Ok(());
        };
        let seen = (*story.status(), story.fragments().len());
        if last != Some(seen) {
            info!(
                story_id = %story_id,
                status = %seen.0,
                fragments = seen.1,
                "Story progress"
            );
            last = Some(seen);
        }
        if story.status().is_terminal() {
            return Ok(());
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Print the story's narrative, or the whole story as JSON.
pub fn print_story(story: &Story, json: bool) -> TesseraResult<()> {
    if json {
        let out = serde_json::to_string_pretty(story)
            .map_err(|e| tessera::JsonError::new(format!("Failed to serialize story: {}", e)))?;
        println!("{out}");
    } else {
        println!("{}", story.final_narrative().as_deref().unwrap_or_default());
    }
    Ok(())
}

/// Run `run` while polling the story, then return the stored story.
pub async fn run_watched<F>(
    stories: Arc<dyn StoryRepository>,
    story_id: &str,
    run: F,
) -> TesseraResult<Story>
where
    F: std::future::Future<Output = TesseraResult<()>>,
{
    let watcher = tokio::spawn(watch_story(stories.clone(), story_id.to_string()));
    run.await?;
    match watcher.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Progress watcher failed"),
        Err(e) => warn!(error = %e, "Progress watcher panicked"),
    }
    stories.get(story_id).await?.ok_or_else(|| {
        let kind = tessera::NarrativeErrorKind::StoryNotFound(story_id.to_string());
        tessera::NarrativeError::new(kind).into()
    })
}
