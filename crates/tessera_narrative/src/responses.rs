//! Shapes of the structured answers agents return.

use serde::Deserialize;
use tessera_core::{Agent, Emotion, MemoryFragment, NarrativePosition};

/// Answer to the extraction call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractionResponse {
    /// Whether the agent found a relevant memory
    #[serde(default)]
    pub has_memory: bool,
    /// Short title
    #[serde(default)]
    pub memory_title: Option<String>,
    /// First-person account
    #[serde(default)]
    pub memory_content: Option<String>,
    /// Emotion tag
    #[serde(default)]
    pub emotion: Option<String>,
    /// When it happened
    #[serde(default)]
    pub time_hint: Option<String>,
    /// Most distinctive detail
    #[serde(default)]
    pub unique_detail: Option<String>,
}

impl ExtractionResponse {
    /// Build the agent's fragment, or `None` when it has nothing to share.
    ///
    /// Missing text fields become empty strings; a memory with blank content
    /// is still kept.
    pub fn into_fragment(self, agent: &Agent) -> Option<MemoryFragment> {
        if !self.has_memory {
            return None;
        }

        Some(
            MemoryFragment::new(agent.id().clone(), agent.name().clone())
                .with_agent_avatar(agent.avatar_url().clone())
                .with_title(self.memory_title.unwrap_or_default())
                .with_content(self.memory_content.unwrap_or_default())
                .with_emotion(Emotion::parse_lenient(
                    self.emotion.as_deref().unwrap_or_default(),
                ))
                .with_time_hint(self.time_hint.unwrap_or_default())
                .with_unique_detail(self.unique_detail.unwrap_or_default()),
        )
    }
}

/// Answer to the negotiation call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProposalResponse {
    /// Requested slot
    #[serde(default)]
    pub proposed_position: Option<String>,
    /// Why that slot
    #[serde(default)]
    pub reason: Option<String>,
    /// Relation to another fragment
    #[serde(default)]
    pub connection_to_others: Option<String>,
    /// Suggested lead-in
    #[serde(default)]
    pub transition_suggestion: Option<String>,
}

impl ProposalResponse {
    /// Record this proposal on `fragment`.
    pub fn apply_to(self, fragment: MemoryFragment) -> MemoryFragment {
        let position =
            NarrativePosition::parse_lenient(self.proposed_position.as_deref().unwrap_or_default());
        let mut fragment = fragment.with_proposed_position(position);
        if let Some(note) = non_blank(self.connection_to_others) {
            fragment = fragment.with_connection_note(note);
        }
        if let Some(hint) = non_blank(self.transition_suggestion) {
            fragment = fragment.with_transition_hint(hint);
        }
        fragment
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use tessera_core::Credentials;

    fn agent() -> Agent {
        Agent::builder()
            .id("a1")
            .name("Mei")
            .credentials(Credentials::new("t", "r", Utc::now() + Duration::hours(1)))
            .build()
            .unwrap()
    }

    #[test]
    fn test_absent_memory_yields_no_fragment() {
        let response: ExtractionResponse =
            serde_json::from_str(r#"{"has_memory": false}"#).unwrap();
        assert!(response.into_fragment(&agent()).is_none());
    }

    #[test]
    fn test_unknown_emotion_becomes_reflective() {
        let response: ExtractionResponse = serde_json::from_str(
            r#"{"has_memory": true, "memory_title": "Tea", "memory_content": "I sat.", "emotion": "wistful", "time_hint": null}"#,
        )
        .unwrap();
        let fragment = response.into_fragment(&agent()).unwrap();
        assert_eq!(*fragment.emotion(), Emotion::Reflective);
        assert_eq!(fragment.agent_name(), "Mei");
        assert!(fragment.time_hint().is_empty());
    }

    #[test]
    fn test_blank_content_is_still_a_fragment() {
        let response: ExtractionResponse = serde_json::from_str(
            r#"{"has_memory": true, "memory_title": "Dawn", "memory_content": ""}"#,
        )
        .unwrap();
        let fragment = response.into_fragment(&agent()).unwrap();
        assert_eq!(fragment.title(), "Dawn");
        assert!(fragment.content().is_empty());
    }

    #[test]
    fn test_unknown_position_becomes_middle() {
        let base = MemoryFragment::builder()
            .agent_id("a1")
            .agent_name("Mei")
            .content("x")
            .build()
            .unwrap();
        let response: ProposalResponse = serde_json::from_str(
            r#"{"proposed_position": "prologue", "connection_to_others": "", "transition_suggestion": "Cut to dawn"}"#,
        )
        .unwrap();
        let fragment = response.apply_to(base);
        assert_eq!(*fragment.proposed_position(), Some(NarrativePosition::Middle));
        assert!(fragment.connection_note().is_none());
        assert_eq!(fragment.transition_hint().as_deref(), Some("Cut to dawn"));
    }
}
