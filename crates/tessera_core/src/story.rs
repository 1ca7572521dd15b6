//! Stories, their lifecycle status, and partial updates.

use crate::MemoryFragment;
use chrono::{DateTime, Utc};
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a story.
///
/// Statuses only move forward. Skipping is allowed (an early failure jumps
/// straight to `Completed`), going backwards is not.
///
/// # Examples
///
/// ```
/// use tessera_core::StoryStatus;
///
/// assert!(StoryStatus::Waiting.can_transition_to(StoryStatus::Extracting));
/// assert!(StoryStatus::Extracting.can_transition_to(StoryStatus::Completed));
/// assert!(!StoryStatus::Weaving.can_transition_to(StoryStatus::Negotiating));
/// assert!(!StoryStatus::Completed.can_transition_to(StoryStatus::Completed));
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
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum StoryStatus {
    /// Created, not started
    #[default]
    #[display("waiting")]
    Waiting,
    /// Collecting one memory per participant
    #[display("extracting")]
    Extracting,
    /// Collecting position proposals
    #[display("negotiating")]
    Negotiating,
    /// Collecting refined renditions
    #[display("weaving")]
    Weaving,
    /// Rendering the final narrative
    #[display("composing")]
    Composing,
    /// Terminal
    #[display("completed")]
    Completed,
}

impl StoryStatus {
    /// Position in the lifecycle, starting at zero.
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Whether the story has reached its terminal status.
    pub fn is_terminal(self) -> bool {
        self == Self::Completed
    }

    /// Whether moving from `self` to `next` keeps the lifecycle forward-only.
    pub fn can_transition_to(self, next: Self) -> bool {
        next.ordinal() > self.ordinal()
    }
}

/// Target and real fragment counts for elastic stories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct PieceCounts {
    /// Total fragments the story will hold
    target_piece_count: usize,
    /// How many of them come from real participants
    real_piece_count: usize,
}

impl PieceCounts {
    /// Create piece counts; `real` is clamped to `target`.
    pub fn new(target: usize, real: usize) -> Self {
        Self {
            target_piece_count: target,
            real_piece_count: real.min(target),
        }
    }

    /// Number of synthesized fill-ins.
    pub fn synthetic_piece_count(&self) -> usize {
        self.target_piece_count - self.real_piece_count
    }
}

/// One collaborative narrative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct Story {
    /// Unique identifier
    #[builder(default = "Story::generate_id()")]
    id: String,
    /// Theme text
    theme: String,
    /// Optional longer description
    #[serde(default)]
    #[builder(default)]
    description: String,
    /// Initiating agent id
    initiator_id: String,
    /// Initiating agent display name
    initiator_name: String,
    /// Current lifecycle status
    #[serde(default)]
    #[builder(default)]
    status: StoryStatus,
    /// Participating agent ids, in invitation order
    #[serde(default)]
    #[builder(default)]
    participant_ids: Vec<String>,
    /// Fragments collected so far
    #[serde(default)]
    #[builder(default)]
    fragments: Vec<MemoryFragment>,
    /// Composed narrative, set once the story completes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    final_narrative: Option<String>,
    /// Elastic piece counts, if this is an elastic story
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    piece_counts: Option<PieceCounts>,
    /// Creation time
    #[builder(default = "chrono::Utc::now()")]
    created_at: DateTime<Utc>,
    /// Completion time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    completed_at: Option<DateTime<Utc>>,
}

impl Story {
    /// Creates a new builder.
    pub fn builder() -> StoryBuilder {
        StoryBuilder::default()
    }

    /// Fresh random story id.
    pub fn generate_id() -> String {
        format!("story-{}", uuid::Uuid::new_v4().simple())
    }

    /// Merge the fields present in `update` into this story.
    ///
    /// Returns `false` (and leaves the story untouched) when the update
    /// carries a status that would move the lifecycle backwards.
    pub fn apply(&mut self, update: StoryUpdate) -> bool {
        if let Some(next) = update.status {
            if next != self.status && !self.status.can_transition_to(next) {
                return false;
            }
            self.status = next;
        }
        if let Some(fragments) = update.fragments {
            self.fragments = fragments;
        }
        if let Some(narrative) = update.final_narrative {
            self.final_narrative = Some(narrative);
        }
        if let Some(completed_at) = update.completed_at {
            self.completed_at = Some(completed_at);
        }
        true
    }

    /// Whether the story reached `Completed` with a narrative.
    pub fn is_finished(&self) -> bool {
        self.status.is_terminal() && self.final_narrative.is_some()
    }
}

/// Partial story update published by the orchestrator.
///
/// # Examples
///
/// ```
/// use tessera_core::{StoryStatus, StoryUpdate};
///
/// let update = StoryUpdate::default().with_status(StoryStatus::Weaving);
/// assert_eq!(update.status, Some(StoryStatus::Weaving));
/// assert!(update.fragments.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_setters::Setters)]
#[setters(prefix = "with_", into, strip_option)]
pub struct StoryUpdate {
    /// New status
    pub status: Option<StoryStatus>,
    /// Full replacement fragment list
    pub fragments: Option<Vec<MemoryFragment>>,
    /// Final narrative text
    pub final_narrative: Option<String>,
    /// Completion time
    pub completed_at: Option<DateTime<Utc>>,
}

impl StoryUpdate {
    /// Update that completes a story with `narrative` now.
    pub fn completed(narrative: impl Into<String>) -> Self {
        Self::default()
            .with_status(StoryStatus::Completed)
            .with_final_narrative(narrative)
            .with_completed_at(Utc::now())
    }
}
