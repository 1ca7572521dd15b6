//! Offline invoker that answers for demo agents from their presets.

use crate::DemoRoster;
use crate::roster::FragmentPreset;
use async_trait::async_trait;
use futures::stream;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tessera_error::{NarrativeError, NarrativeErrorKind, TesseraResult};
use tessera_interface::{AgentInvoker, StreamChunk, TokenStream};
use tracing::{debug, instrument};

/// Prefix of the bearer tokens issued to seeded demo agents.
pub const DEMO_TOKEN_PREFIX: &str = "demo:";

const CHUNKS_PER_ANSWER: usize = 4;

/// Answers structured and free-form calls from the demo roster.
///
/// The agent is identified by its token (`demo:<agent id>`). Structured
/// calls whose action control asks for a position receive the preset
/// proposal; all other structured calls receive the preset memory. Free-form
/// calls receive the preset refined rendition. Answers arrive after
/// `latency`, split over a few chunks.
#[derive(Debug, Clone)]
pub struct PresetInvoker {
    roster: Arc<DemoRoster>,
    latency: Duration,
}

impl PresetInvoker {
    /// Create an invoker answering without delay.
    pub fn new(roster: Arc<DemoRoster>) -> Self {
        Self {
            roster,
            latency: Duration::ZERO,
        }
    }

    /// Delay every answer by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Bearer token a seeded demo agent carries.
    pub fn token_for(agent_id: &str) -> String {
        format!("{DEMO_TOKEN_PREFIX}{agent_id}")
    }

    fn preset_for(&self, access_token: &str) -> TesseraResult<&FragmentPreset> {
        let agent_id = access_token
            .strip_prefix(DEMO_TOKEN_PREFIX)
            .unwrap_or(access_token);
        self.roster.preset(agent_id).ok_or_else(|| {
            NarrativeError::new(NarrativeErrorKind::Invocation {
                agent: agent_id.to_string(),
                message: "no preset for this agent".into(),
            })
            .into()
        })
    }

    async fn answer(&self, text: String) -> TesseraResult<TokenStream> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let chars: Vec<char> = text.chars().collect();
        let size = chars.len().div_ceil(CHUNKS_PER_ANSWER).max(1);
        let mut chunks: Vec<TesseraResult<StreamChunk>> = chars
            .chunks(size)
            .map(|piece| Ok(StreamChunk::text(piece.iter().collect::<String>())))
            .collect();
        chunks.push(Ok(StreamChunk::end()));
        Ok(Box::pin(stream::iter(chunks)))
    }
}

#[async_trait]
impl AgentInvoker for PresetInvoker {
    #[instrument(skip_all)]
    async fn act(
        &self,
        access_token: &str,
        _message: &str,
        action_control: &str,
    ) -> TesseraResult<TokenStream> {
        let preset = self.preset_for(access_token)?;
        let body = if action_control.contains("proposed_position") {
            json!({
                "proposed_position": preset.proposed_position().to_string(),
                "reason": preset.connection_note(),
                "connection_to_others": preset.connection_note(),
                "transition_suggestion": preset.transition_hint(),
            })
        } else {
            json!({
                "has_memory": true,
                "memory_title": preset.title(),
                "memory_content": preset.content(),
                "emotion": preset.emotion().to_string(),
                "time_hint": preset.time_hint(),
                "unique_detail": preset.unique_detail(),
            })
        };
        debug!("Answering structured call from preset");
        self.answer(body.to_string()).await
    }

    #[instrument(skip_all)]
    async fn chat(&self, access_token: &str, _message: &str) -> TesseraResult<TokenStream> {
        let preset = self.preset_for(access_token)?;
        debug!("Answering free-form call from preset");
        self.answer(preset.refined_content().clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::{EXTRACTION_CONTROL, PROPOSAL_CONTROL};
    use crate::responses::{ExtractionResponse, ProposalResponse};
    use tessera_interface::collect_text;

    fn invoker() -> PresetInvoker {
        PresetInvoker::new(Arc::new(DemoRoster::bundled().unwrap()))
    }

    #[tokio::test]
    async fn test_extraction_answer_parses() -> anyhow::Result<()> {
        let stream = invoker()
            .act("demo:demo-local", "Theme: x", EXTRACTION_CONTROL)
            .await?;
        let response: ExtractionResponse = serde_json::from_str(&collect_text(stream).await?)?;
        assert!(response.has_memory);
        assert!(response.memory_content.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_proposal_answer_parses() -> anyhow::Result<()> {
        let stream = invoker()
            .act("demo:demo-techie", "digest", PROPOSAL_CONTROL)
            .await?;
        let response: ProposalResponse = serde_json::from_str(&collect_text(stream).await?)?;
        assert_eq!(response.proposed_position.as_deref(), Some("closing"));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_agent_is_an_error() {
        assert!(invoker().chat("demo:nobody", "hi").await.is_err());
    }
}
