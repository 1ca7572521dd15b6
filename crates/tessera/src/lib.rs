//! Tessera - collaborative memory narratives.
//!
//! Several autonomous agents each contribute one private memory on a shared
//! theme, negotiate the order the memories should be told in, rewrite their
//! own piece so it flows from its neighbors, and end up with one composed
//! Markdown story.
//!
//! # Architecture
//!
//! Tessera is organized as a workspace with focused crates:
//!
//! - `tessera_error` - Error types
//! - `tessera_core` - Data model (agents, fragments, stories) and logging setup
//! - `tessera_interface` - Collaborator traits and token streams
//! - `tessera_storage` - In-memory repository and directory
//! - `tessera_client` - SecondMe service client and onboarding
//! - `tessera_narrative` - The four-phase narrative engine
//!
//! This crate (`tessera`) re-exports everything for convenience and adds
//! layered configuration, the agents file and the `tessera` binary.

mod agents_file;
mod config;

pub use agents_file::{load_agents, save_agents};
pub use config::{LoggingConfig, TesseraConfig};

pub use tessera_client::*;
pub use tessera_core::*;
pub use tessera_error::*;
pub use tessera_interface::*;
pub use tessera_narrative::*;
pub use tessera_storage::*;
