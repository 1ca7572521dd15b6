//! Declarative demo roster and its fragment presets.
//!
//! The roster lists demo agents in canonical narrative order. Each entry
//! carries a preset: the fragment the agent contributes, the position it
//! proposes and its refined rendition. Elastic stories use the presets to
//! fill in for missing participants, and [`PresetInvoker`](crate::PresetInvoker)
//! answers for the demo agents from the same table.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use tessera_core::{Emotion, MemoryFragment, NarrativePosition};
use tessera_error::{NarrativeError, NarrativeErrorKind};

const BUNDLED_ROSTER: &str = include_str!("../demo_roster.toml");

/// Pre-authored fragment content for one demo agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct FragmentPreset {
    /// Fragment title
    title: String,
    /// Raw first-person content
    content: String,
    /// Emotion tag
    emotion: Emotion,
    /// Time hint
    time_hint: String,
    /// Most distinctive detail
    unique_detail: String,
    /// Position the agent proposes
    proposed_position: NarrativePosition,
    /// Relation to the other fragments
    connection_note: String,
    /// Suggested lead-in
    transition_hint: String,
    /// Woven rendition
    refined_content: String,
}

/// One demo agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RosterEntry {
    /// Agent id
    id: String,
    /// Display name
    name: String,
    /// Avatar URL
    #[serde(default)]
    avatar_url: String,
    /// Capability tags
    #[serde(default)]
    shades: Vec<String>,
    /// Memory excerpts
    #[serde(default)]
    memory_snippets: Vec<String>,
    /// Fragment preset
    preset: FragmentPreset,
}

impl RosterEntry {
    /// Fragment as extracted, before negotiation.
    ///
    /// `display_name` is the name shown in the story, which carries the
    /// synthetic suffix for fill-ins.
    pub fn extracted_fragment(&self, display_name: &str, synthetic: bool) -> MemoryFragment {
        MemoryFragment::new(self.id.clone(), display_name)
            .with_agent_avatar(self.avatar_url.clone())
            .with_title(self.preset.title.clone())
            .with_content(self.preset.content.clone())
            .with_emotion(self.preset.emotion)
            .with_time_hint(self.preset.time_hint.clone())
            .with_unique_detail(self.preset.unique_detail.clone())
            .with_is_ai_generated(synthetic)
    }

    /// Apply this agent's preset proposal to `fragment`.
    pub fn apply_proposal(&self, fragment: MemoryFragment) -> MemoryFragment {
        fragment
            .with_proposed_position(self.preset.proposed_position)
            .with_connection_note(self.preset.connection_note.clone())
            .with_transition_hint(self.preset.transition_hint.clone())
    }
}

/// The demo roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct DemoRoster {
    /// Appended to a synthesized fragment's display name
    synthetic_suffix: String,
    /// Entries in canonical narrative order
    agents: Vec<RosterEntry>,
}

impl DemoRoster {
    /// The roster bundled with the crate.
    pub fn bundled() -> Result<Self, NarrativeError> {
        BUNDLED_ROSTER.parse()
    }

    /// Load a roster from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, NarrativeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            NarrativeError::new(NarrativeErrorKind::Presets(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )))
        })?;
        content.parse()
    }

    /// Number of entries; also the elastic target piece count.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the roster has no entries.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Entry for `id`.
    pub fn entry(&self, id: &str) -> Option<&RosterEntry> {
        self.agents.iter().find(|entry| entry.id == id)
    }

    /// Preset for `id`.
    pub fn preset(&self, id: &str) -> Option<&FragmentPreset> {
        self.entry(id).map(|entry| &entry.preset)
    }

    /// Agent ids in canonical order.
    pub fn canonical_ids(&self) -> Vec<String> {
        self.agents.iter().map(|entry| entry.id.clone()).collect()
    }

    /// Display name for a synthesized fragment.
    pub fn synthetic_name(&self, name: &str) -> String {
        format!("{}{}", name, self.synthetic_suffix)
    }

    fn validate(self) -> Result<Self, NarrativeError> {
        if self.agents.is_empty() {
            return Err(NarrativeError::new(NarrativeErrorKind::Presets(
                "roster has no agents".into(),
            )));
        }
        let mut seen = HashSet::new();
        for entry in &self.agents {
            if !seen.insert(entry.id.as_str()) {
                return Err(NarrativeError::new(NarrativeErrorKind::Presets(format!(
                    "duplicate agent id '{}'",
                    entry.id
                ))));
            }
        }
        Ok(self)
    }
}

impl FromStr for DemoRoster {
    type Err = NarrativeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let roster: DemoRoster = toml::from_str(s)
            .map_err(|e| NarrativeError::new(NarrativeErrorKind::Presets(e.to_string())))?;
        roster.validate()
    }
}
