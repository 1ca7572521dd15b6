//! The narrative orchestrator.
//!
//! One run drives one story through extraction, negotiation, weaving and
//! composition. Every phase, and every participant response within the
//! first two, is written back to the story repository so pollers can watch
//! the story fill in. Per-participant failures never escape a phase: they
//! are logged and replaced by the phase's fallback.

use crate::compose::{CompositionMode, compose_narrative};
use crate::extraction::parse_structured;
use crate::ordering::sort_by_position;
use crate::prompts::{
    EXTRACTION_CONTROL, PROPOSAL_CONTROL, extraction_message, fragment_digest, proposal_message,
    weaving_prompt,
};
use crate::responses::{ExtractionResponse, ProposalResponse};
use crate::text::truncate_chars;
use crate::{DemoRoster, NarrativeConfig};
use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;
use std::sync::Arc;
use tessera_core::{Agent, MemoryFragment, NarrativePosition, Story, StoryStatus, StoryUpdate};
use tessera_error::{NarrativeError, NarrativeErrorKind, TesseraResult};
use tessera_interface::{AgentDirectory, AgentInvoker, StoryRepository, collect_text};
use tracing::{debug, error, info, instrument, warn};

/// Final narrative when no participant could be resolved.
pub const NO_PARTICIPANTS_NARRATIVE: &str =
    "⚠️ Not enough participants were available to contribute memories.";

/// Final narrative when a run fails unexpectedly.
pub const APOLOGY_NARRATIVE: &str =
    "⚠️ Something went wrong while weaving this story. We're sorry.";

/// Who takes part in a run.
struct Cast {
    live: Vec<Agent>,
    synthetic: Vec<MemoryFragment>,
    roster: Option<Arc<DemoRoster>>,
    mode: CompositionMode,
}

impl Cast {
    fn live_agent(&self, id: &str) -> Option<&Agent> {
        self.live.iter().find(|agent| agent.id() == id)
    }

    fn preset_proposal(&self, fragment: MemoryFragment) -> MemoryFragment {
        match self
            .roster
            .as_deref()
            .and_then(|roster| roster.entry(fragment.agent_id()))
        {
            Some(entry) => entry.apply_proposal(fragment),
            None => fragment.with_proposed_position(NarrativePosition::Middle),
        }
    }

    fn preset_refinement(&self, fragment: &MemoryFragment) -> Option<String> {
        self.roster
            .as_deref()
            .and_then(|roster| roster.preset(fragment.agent_id()))
            .map(|preset| preset.refined_content().clone())
    }
}

/// Runs stories through the four narrative phases.
///
/// Collaborators are injected once; a single orchestrator can run any
/// number of stories, one run per story id.
#[derive(Clone)]
pub struct NarrativeOrchestrator {
    stories: Arc<dyn StoryRepository>,
    agents: Arc<dyn AgentDirectory>,
    invoker: Arc<dyn AgentInvoker>,
    config: NarrativeConfig,
    roster: Option<Arc<DemoRoster>>,
}

impl std::fmt::Debug for NarrativeOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrativeOrchestrator")
            .field("config", &self.config)
            .field("has_roster", &self.roster.is_some())
            .finish_non_exhaustive()
    }
}

impl NarrativeOrchestrator {
    /// Create an orchestrator with default settings and no demo roster.
    pub fn new(
        stories: Arc<dyn StoryRepository>,
        agents: Arc<dyn AgentDirectory>,
        invoker: Arc<dyn AgentInvoker>,
    ) -> Self {
        Self {
            stories,
            agents,
            invoker,
            config: NarrativeConfig::default(),
            roster: None,
        }
    }

    /// Use `config` for timeouts and text limits.
    pub fn with_config(mut self, config: NarrativeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide the preset table used to fill elastic stories.
    pub fn with_roster(mut self, roster: Arc<DemoRoster>) -> Self {
        self.roster = Some(roster);
        self
    }

    /// Active settings.
    pub fn config(&self) -> &NarrativeConfig {
        &self.config
    }

    /// Run the story to completion.
    ///
    /// All output goes to the story repository. The only error returned is
    /// an unknown story id (or a repository that cannot record the final
    /// state); every other failure ends with the story `completed` and a
    /// non-empty narrative explaining what happened.
    #[instrument(skip(self))]
    pub async fn run(&self, story_id: &str) -> TesseraResult<()> {
        let story = self.stories.get(story_id).await?.ok_or_else(|| {
            NarrativeError::new(NarrativeErrorKind::StoryNotFound(story_id.to_string()))
        })?;

        if *story.status() != StoryStatus::Waiting {
            warn!(status = %story.status(), "Story already started, not running again");
            return Ok(());
        }

        if let Err(e) = self.run_phases(&story).await {
            error!(error = %e, "Narrative run failed, completing with apology");
            self.stories
                .update(story_id, StoryUpdate::completed(APOLOGY_NARRATIVE))
                .await?;
        }
        Ok(())
    }

    /// Run the story on a background task.
    pub fn spawn(self: Arc<Self>, story_id: String) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(e) = self.run(&story_id).await {
                error!(story_id = %story_id, error = %e, "Background narrative run failed");
            }
        })
    }

    async fn run_phases(&self, story: &Story) -> TesseraResult<()> {
        let id = story.id().as_str();
        let cast = self.resolve_cast(story).await?;

        if cast.live.is_empty() {
            let reason = NarrativeError::new(NarrativeErrorKind::NoParticipants(id.to_string()));
            error!(
                error = %reason,
                invited = story.participant_ids().len(),
                "Completing story without running phases"
            );
            self.stories
                .update(id, StoryUpdate::completed(NO_PARTICIPANTS_NARRATIVE))
                .await?;
            return Ok(());
        }

        self.transition(id, StoryStatus::Extracting, None).await?;
        let extracted = self.extract(story, &cast).await?;

        self.transition(id, StoryStatus::Negotiating, Some(extracted.clone()))
            .await?;
        let negotiated = self.negotiate(story, &cast, extracted).await?;

        self.transition(id, StoryStatus::Weaving, Some(negotiated.clone()))
            .await?;
        let woven = self.weave(story, &cast, negotiated).await?;

        self.transition(id, StoryStatus::Composing, Some(woven.clone()))
            .await?;
        let narrative = compose_narrative(story.theme(), &woven, cast.mode);
        info!(
            story_id = id,
            fragments = woven.len(),
            chars = narrative.chars().count(),
            "Phase 4: composition finished"
        );

        self.stories
            .update(id, StoryUpdate::completed(narrative).with_fragments(woven))
            .await?;
        info!(story_id = id, status = %StoryStatus::Completed, "Status transition");
        Ok(())
    }

    async fn resolve_cast(&self, story: &Story) -> TesseraResult<Cast> {
        let ids = story.participant_ids();
        let Some(counts) = story.piece_counts() else {
            return Ok(Cast {
                live: self.resolve_agents(ids).await?,
                synthetic: Vec::new(),
                roster: None,
                mode: CompositionMode::Standard,
            });
        };

        let roster = self.roster.clone().ok_or_else(|| {
            NarrativeError::new(NarrativeErrorKind::Presets(
                "elastic story requires a demo roster".into(),
            ))
        })?;
        let real = (*counts.real_piece_count()).min(ids.len());
        let live = self.resolve_agents(&ids[..real]).await?;

        let mut synthetic = Vec::new();
        for id in &ids[real..] {
            let Some(entry) = roster.entry(id) else {
                warn!(agent_id = %id, "No preset for synthetic participant, skipping");
                continue;
            };
            let name = match self.agents.get(id).await? {
                Some(agent) => agent.name().clone(),
                None => entry.name().clone(),
            };
            synthetic.push(entry.extracted_fragment(&roster.synthetic_name(&name), true));
        }

        debug!(
            real = live.len(),
            synthetic = synthetic.len(),
            "Resolved elastic cast"
        );
        Ok(Cast {
            live,
            synthetic,
            roster: Some(roster),
            mode: CompositionMode::Elastic,
        })
    }

    async fn resolve_agents(&self, ids: &[String]) -> TesseraResult<Vec<Agent>> {
        let mut agents = Vec::with_capacity(ids.len());
        for id in ids {
            match self.agents.get(id).await? {
                Some(agent) => agents.push(agent),
                None => warn!(agent_id = %id, "Participant missing from directory, skipping"),
            }
        }
        Ok(agents)
    }

    async fn transition(
        &self,
        story_id: &str,
        status: StoryStatus,
        fragments: Option<Vec<MemoryFragment>>,
    ) -> TesseraResult<()> {
        let mut update = StoryUpdate::default().with_status(status);
        if let Some(fragments) = fragments {
            update = update.with_fragments(fragments);
        }
        info!(story_id, status = %status, "Status transition");
        self.stories.update(story_id, update).await
    }

    async fn publish(&self, story_id: &str, fragments: &[MemoryFragment]) -> TesseraResult<()> {
        self.stories
            .update(
                story_id,
                StoryUpdate::default().with_fragments(fragments.to_vec()),
            )
            .await
    }

    async fn bounded<F>(&self, agent: &Agent, call: F) -> TesseraResult<String>
    where
        F: Future<Output = TesseraResult<String>>,
    {
        match tokio::time::timeout(self.config.invocation_timeout(), call).await {
            Ok(result) => result,
            Err(_) => Err(NarrativeError::new(NarrativeErrorKind::Timeout {
                agent: agent.id().clone(),
                seconds: *self.config.invocation_timeout_secs(),
            })
            .into()),
        }
    }

    async fn invoke_structured(
        &self,
        agent: &Agent,
        message: &str,
        control: &str,
    ) -> TesseraResult<String> {
        self.bounded(agent, async {
            let stream = self
                .invoker
                .act(agent.access_token(), message, control)
                .await?;
            collect_text(stream).await
        })
        .await
    }

    async fn invoke_free_form(&self, agent: &Agent, message: &str) -> TesseraResult<String> {
        self.bounded(agent, async {
            let stream = self.invoker.chat(agent.access_token(), message).await?;
            collect_text(stream).await
        })
        .await
    }

    #[instrument(skip_all, fields(story_id = %story.id(), participants = cast.live.len()))]
    async fn extract(&self, story: &Story, cast: &Cast) -> TesseraResult<Vec<MemoryFragment>> {
        info!("Phase 1: extraction started");
        let message = extraction_message(story);
        let message = message.as_str();

        let mut pending: FuturesUnordered<_> = cast
            .live
            .iter()
            .map(|agent| async move { (agent, self.extract_one(agent, message).await) })
            .collect();

        let mut fragments = Vec::with_capacity(cast.live.len() + cast.synthetic.len());
        while let Some((agent, outcome)) = pending.next().await {
            match outcome {
                Ok(Some(fragment)) => {
                    debug!(agent_id = %agent.id(), title = %fragment.title(), "Memory extracted");
                    fragments.push(fragment);
                    self.publish(story.id(), &fragments).await?;
                }
                Ok(None) => debug!(agent_id = %agent.id(), "No relevant memory"),
                Err(e) => warn!(agent_id = %agent.id(), error = %e, "Extraction failed"),
            }
        }

        for fragment in &cast.synthetic {
            fragments.push(fragment.clone());
            self.publish(story.id(), &fragments).await?;
        }

        info!(fragments = fragments.len(), "Phase 1: extraction finished");
        Ok(fragments)
    }

    async fn extract_one(
        &self,
        agent: &Agent,
        message: &str,
    ) -> TesseraResult<Option<MemoryFragment>> {
        let raw = self
            .invoke_structured(agent, message, EXTRACTION_CONTROL)
            .await?;
        let response: ExtractionResponse = parse_structured(&raw)?;
        Ok(response.into_fragment(agent))
    }

    #[instrument(skip_all, fields(story_id = %story.id(), fragments = fragments.len()))]
    async fn negotiate(
        &self,
        story: &Story,
        cast: &Cast,
        fragments: Vec<MemoryFragment>,
    ) -> TesseraResult<Vec<MemoryFragment>> {
        info!("Phase 2: negotiation started");
        let digest = fragment_digest(&fragments, *self.config.digest_excerpt_chars());
        let digest = digest.as_str();
        let mut negotiated = fragments.clone();

        let mut pending = FuturesUnordered::new();
        for (idx, fragment) in fragments.iter().enumerate() {
            if *fragment.is_ai_generated() {
                negotiated[idx] = cast.preset_proposal(fragment.clone());
                continue;
            }
            let agent = cast.live_agent(fragment.agent_id());
            pending.push(async move {
                let outcome = match agent {
                    Some(agent) => self.propose_one(story.theme(), digest, agent, fragment).await,
                    None => Err(NarrativeError::new(NarrativeErrorKind::AgentMissing(
                        fragment.agent_id().clone(),
                    ))
                    .into()),
                };
                (idx, outcome)
            });
        }

        while let Some((idx, outcome)) = pending.next().await {
            let fragment = fragments[idx].clone();
            negotiated[idx] = match outcome {
                Ok(proposal) => {
                    debug!(
                        agent_id = %fragment.agent_id(),
                        position = ?proposal.proposed_position,
                        reason = ?proposal.reason,
                        "Position proposed"
                    );
                    proposal.apply_to(fragment)
                }
                Err(e) => {
                    warn!(
                        agent_id = %fragment.agent_id(),
                        error = %e,
                        "Negotiation failed, defaulting to middle"
                    );
                    fragment.with_proposed_position(NarrativePosition::Middle)
                }
            };
            self.publish(story.id(), &negotiated).await?;
        }

        sort_by_position(&mut negotiated);
        info!(
            order = ?negotiated.iter().map(|f| f.agent_id().as_str()).collect::<Vec<_>>(),
            "Phase 2: negotiation finished"
        );
        Ok(negotiated)
    }

    async fn propose_one(
        &self,
        theme: &str,
        digest: &str,
        agent: &Agent,
        fragment: &MemoryFragment,
    ) -> TesseraResult<ProposalResponse> {
        let message = proposal_message(theme, digest, fragment);
        let raw = self
            .invoke_structured(agent, &message, PROPOSAL_CONTROL)
            .await?;
        Ok(parse_structured(&raw)?)
    }

    #[instrument(skip_all, fields(story_id = %story.id(), fragments = snapshot.len()))]
    async fn weave(
        &self,
        story: &Story,
        cast: &Cast,
        snapshot: Vec<MemoryFragment>,
    ) -> TesseraResult<Vec<MemoryFragment>> {
        info!("Phase 3: weaving started");
        let mut woven = snapshot.clone();

        for idx in 0..snapshot.len() {
            let fragment = &snapshot[idx];
            let refined = if *fragment.is_ai_generated() {
                cast.preset_refinement(fragment)
                    .unwrap_or_else(|| fragment.content().clone())
            } else {
                match self.weave_one(story, cast, &snapshot, idx).await {
                    Ok(text) => truncate_chars(&text, *self.config.max_refined_chars()),
                    Err(e) => {
                        warn!(
                            agent_id = %fragment.agent_id(),
                            error = %e,
                            "Weaving failed, keeping original content"
                        );
                        fragment.content().clone()
                    }
                }
            };
            woven[idx] = fragment.clone().with_refined_content(refined);
            self.publish(story.id(), &woven).await?;
        }

        info!("Phase 3: weaving finished");
        Ok(woven)
    }

    async fn weave_one(
        &self,
        story: &Story,
        cast: &Cast,
        snapshot: &[MemoryFragment],
        idx: usize,
    ) -> TesseraResult<String> {
        let fragment = &snapshot[idx];
        let agent = cast.live_agent(fragment.agent_id()).ok_or_else(|| {
            NarrativeError::new(NarrativeErrorKind::AgentMissing(
                fragment.agent_id().clone(),
            ))
        })?;
        let prompt = weaving_prompt(
            story.theme(),
            snapshot,
            idx,
            *self.config.neighbor_excerpt_chars(),
        );
        let text = self.invoke_free_form(agent, &prompt).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(NarrativeError::new(NarrativeErrorKind::ResponseShape(
                "empty weaving response".into(),
            ))
            .into());
        }
        Ok(text.to_string())
    }
}
