//! Memory fragments and their enumerated attributes.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Emotional tone of a fragment.
///
/// Parsing is lenient: anything outside the fixed set becomes
/// [`Emotion::Reflective`].
///
/// # Examples
///
/// ```
/// use tessera_core::Emotion;
///
/// assert_eq!(Emotion::parse_lenient("Nostalgic"), Emotion::Nostalgic);
/// assert_eq!(Emotion::parse_lenient("melancholy"), Emotion::Reflective);
/// assert_eq!(Emotion::Excited.to_string(), "excited");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Emotion {
    /// Joyful memory
    Happy,
    /// Wistful look back
    Nostalgic,
    /// High-energy memory
    Excited,
    /// Thoughtful memory
    #[default]
    Reflective,
    /// Unexpected turn
    Surprising,
}

impl Emotion {
    /// Parse an emotion tag, falling back to `Reflective`.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.trim().parse().unwrap_or_default()
    }
}

/// Structural slot a fragment proposes for itself.
///
/// Declaration order is narrative order, so `Ord` matches [`rank`](Self::rank).
///
/// # Examples
///
/// ```
/// use tessera_core::NarrativePosition;
///
/// assert_eq!(NarrativePosition::parse_lenient("climax"), NarrativePosition::Climax);
/// assert_eq!(NarrativePosition::parse_lenient("epilogue"), NarrativePosition::Middle);
/// assert_eq!(NarrativePosition::rank_of(None), 1);
/// assert!(NarrativePosition::Opening < NarrativePosition::Closing);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NarrativePosition {
    /// Sets the scene
    Opening,
    /// Develops the story
    #[default]
    Middle,
    /// Emotional peak
    Climax,
    /// Resolves the story
    Closing,
}

impl NarrativePosition {
    /// Sort rank: opening 0, middle 1, climax 2, closing 3.
    pub fn rank(self) -> u8 {
        match self {
            Self::Opening => 0,
            Self::Middle => 1,
            Self::Climax => 2,
            Self::Closing => 3,
        }
    }

    /// Rank of an optional position; missing counts as middle.
    pub fn rank_of(position: Option<Self>) -> u8 {
        position.unwrap_or_default().rank()
    }

    /// Parse a proposed position, falling back to `Middle`.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.trim().parse().unwrap_or_default()
    }
}

/// One agent's contribution to one story.
///
/// Created during extraction, enriched by negotiation (position, notes) and
/// again by weaving (refined content). Never deleted.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    Builder,
)]
#[serde(rename_all = "camelCase")]
#[setters(prefix = "with_", into, strip_option)]
#[builder(setter(into))]
pub struct MemoryFragment {
    /// Owning agent id
    agent_id: String,
    /// Owning agent display name (suffixed for synthesized fragments)
    agent_name: String,
    /// Owning agent avatar URL
    #[serde(default)]
    #[builder(default)]
    agent_avatar: String,
    /// Short title
    #[builder(default)]
    title: String,
    /// First-person raw content
    #[builder(default)]
    content: String,
    /// Emotion tag
    #[serde(default)]
    #[builder(default)]
    emotion: Emotion,
    /// Free-text time hint ("last summer")
    #[serde(default)]
    #[builder(default)]
    time_hint: String,
    /// The single most distinctive detail
    #[serde(default)]
    #[builder(default)]
    unique_detail: String,
    /// Position proposed during negotiation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    proposed_position: Option<NarrativePosition>,
    /// Which other fragment this one relates to, and how
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    connection_note: Option<String>,
    /// Suggested transition into this fragment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    transition_hint: Option<String>,
    /// Content re-rendered during weaving
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    refined_content: Option<String>,
    /// Synthesized fill-in rather than a real participant's memory
    #[serde(default)]
    #[builder(default)]
    is_ai_generated: bool,
}

impl MemoryFragment {
    /// Creates a new builder.
    pub fn builder() -> MemoryFragmentBuilder {
        MemoryFragmentBuilder::default()
    }

    /// Bare fragment owned by `agent_id`; fill it in with the `with_*` setters.
    pub fn new(agent_id: impl Into<String>, agent_name: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            agent_name: agent_name.into(),
            agent_avatar: String::new(),
            title: String::new(),
            content: String::new(),
            emotion: Emotion::default(),
            time_hint: String::new(),
            unique_detail: String::new(),
            proposed_position: None,
            connection_note: None,
            transition_hint: None,
            refined_content: None,
            is_ai_generated: false,
        }
    }

    /// Text used in the final narrative: refined content when present and
    /// non-blank, otherwise the raw content.
    pub fn display_content(&self) -> &str {
        match self.refined_content.as_deref() {
            Some(refined) if !refined.trim().is_empty() => refined,
            _ => &self.content,
        }
    }

    /// Sort rank of the proposed position.
    pub fn position_rank(&self) -> u8 {
        NarrativePosition::rank_of(self.proposed_position)
    }
}
