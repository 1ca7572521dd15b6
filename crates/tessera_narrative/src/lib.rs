//! Collaborative narrative engine.
//!
//! A story gathers one memory from each participating agent, lets the
//! agents negotiate where their memory belongs, has each agent rewrite its
//! memory in light of its neighbors, and composes the result into one
//! Markdown narrative. [`NarrativeOrchestrator`] drives the phases; the
//! other modules provide the prompts, response parsing, ordering and
//! composition it is built from.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tessera_narrative::{DemoRoster, NarrativeOrchestrator, PresetInvoker};
//! # use tessera_interface::{AgentDirectory, StoryRepository};
//! # async fn demo(
//! #     stories: Arc<dyn StoryRepository>,
//! #     agents: Arc<dyn AgentDirectory>,
//! # ) -> tessera_error::TesseraResult<()> {
//! let roster = Arc::new(DemoRoster::bundled()?);
//! let invoker = Arc::new(PresetInvoker::new(roster.clone()));
//! let orchestrator = NarrativeOrchestrator::new(stories, agents, invoker).with_roster(roster);
//! orchestrator.run("story-1").await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod compose;
mod config;
mod elastic;
mod extraction;
mod matching;
mod orchestrator;
mod ordering;
mod preset_invoker;
mod prompts;
mod responses;
mod roster;
mod seed;
mod text;

pub use compose::{CompositionMode, CompositionStats, compose_narrative};
pub use config::{NarrativeConfig, NarrativeConfigBuilder};
pub use elastic::{ElasticRequest, ElasticRequestBuilder, create_elastic_story};
pub use extraction::{extract_json_object, parse_structured, strip_code_fences};
pub use matching::match_agents_for_theme;
pub use orchestrator::{APOLOGY_NARRATIVE, NO_PARTICIPANTS_NARRATIVE, NarrativeOrchestrator};
pub use ordering::sort_by_position;
pub use preset_invoker::{DEMO_TOKEN_PREFIX, PresetInvoker};
pub use prompts::{
    EXTRACTION_CONTROL, PROPOSAL_CONTROL, extraction_message, fragment_digest, proposal_message,
    weaving_prompt,
};
pub use responses::{ExtractionResponse, ProposalResponse};
pub use roster::{DemoRoster, FragmentPreset, RosterEntry};
pub use seed::{DEMO_CREDITS, seed_demo_agents};
pub use text::truncate_chars;
