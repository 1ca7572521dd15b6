//! Core data types for the Tessera collaborative narrative engine.
//!
//! Agents, memory fragments, stories, and the story lifecycle. Everything
//! here is plain data; behavior lives in `tessera_narrative`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod agent;
mod fragment;
mod story;
mod telemetry;

pub use agent::{Agent, AgentBuilder, Credentials};
pub use fragment::{Emotion, MemoryFragment, MemoryFragmentBuilder, NarrativePosition};
pub use story::{PieceCounts, Story, StoryBuilder, StoryStatus, StoryUpdate};
pub use telemetry::{LogFormat, init_logging};
