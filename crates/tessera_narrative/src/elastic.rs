//! Elastic stories: a fixed cast with a chosen number of real participants.

use crate::{DemoRoster, seed_demo_agents};
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tessera_core::{PieceCounts, Story, StoryStatus};
use tessera_error::{BuilderError, NarrativeError, NarrativeErrorKind, TesseraResult};
use tessera_interface::{AgentDirectory, StoryRepository};
use tracing::{info, instrument};

/// Request to start an elastic story.
///
/// # Examples
///
/// ```
/// use tessera_narrative::ElasticRequest;
///
/// let request = ElasticRequest::builder().theme("Summer").build().unwrap();
/// assert_eq!(*request.real_agent_count(), 2);
/// assert_eq!(request.initiator_id(), "demo-user");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct ElasticRequest {
    /// Story theme; must not be blank
    theme: String,
    /// Optional description
    #[serde(default)]
    #[builder(default)]
    description: String,
    /// Requested number of real participants
    #[serde(default = "default_real_agent_count")]
    #[builder(default = "default_real_agent_count()")]
    real_agent_count: usize,
    /// Initiating user id
    #[serde(default = "default_initiator_id")]
    #[builder(default = "default_initiator_id()")]
    initiator_id: String,
    /// Initiating user display name
    #[serde(default = "default_initiator_name")]
    #[builder(default = "default_initiator_name()")]
    initiator_name: String,
}

fn default_real_agent_count() -> usize {
    2
}

fn default_initiator_id() -> String {
    "demo-user".to_string()
}

fn default_initiator_name() -> String {
    "You".to_string()
}

impl ElasticRequest {
    /// Creates a new builder.
    pub fn builder() -> ElasticRequestBuilder {
        ElasticRequestBuilder::default()
    }
}

/// Create an elastic story and return its id.
///
/// The roster is seeded first. The story invites every roster agent in
/// canonical order; the first `real_agent_count` (clamped to
/// `1..=roster.len()`) take part live and the rest are filled from presets.
/// The story is left `waiting` for an orchestrator run.
#[instrument(skip_all, fields(theme = %request.theme(), requested = request.real_agent_count()))]
pub async fn create_elastic_story(
    stories: &dyn StoryRepository,
    agents: &dyn AgentDirectory,
    roster: &DemoRoster,
    request: &ElasticRequest,
) -> TesseraResult<String> {
    if request.theme().trim().is_empty() {
        return Err(NarrativeError::new(NarrativeErrorKind::InvalidRequest(
            "theme must not be empty".into(),
        ))
        .into());
    }
    if roster.is_empty() {
        return Err(NarrativeError::new(NarrativeErrorKind::Presets(
            "roster has no agents".into(),
        ))
        .into());
    }

    seed_demo_agents(agents, roster).await?;

    let target = roster.len();
    let real = (*request.real_agent_count()).clamp(1, target);
    let story = Story::builder()
        .theme(request.theme().trim())
        .description(request.description().clone())
        .initiator_id(request.initiator_id().clone())
        .initiator_name(request.initiator_name().clone())
        .status(StoryStatus::Waiting)
        .participant_ids(roster.canonical_ids())
        .piece_counts(Some(PieceCounts::new(target, real)))
        .build()
        .map_err(|e| BuilderError::from(e.to_string()))?;

    let id = story.id().clone();
    stories.create(story).await?;
    info!(story_id = %id, real, target, "Created elastic story");
    Ok(id)
}
