//! Shared fixtures for the narrative integration tests.

#![allow(dead_code)]

pub mod mock_invoker;
pub mod recording_repository;

pub use mock_invoker::{CallKind, MockInvoker, Reply, Script};
pub use recording_repository::RecordingRepository;

use chrono::{Duration, Utc};
use tessera_core::{Agent, Credentials, Story};

/// Agent whose bearer token is its id.
pub fn agent(id: &str, name: &str) -> Agent {
    Agent::builder()
        .id(id)
        .name(name)
        .credentials(Credentials::new(id, "refresh", Utc::now() + Duration::hours(1)))
        .build()
        .unwrap()
}

/// Waiting story inviting `participants`.
pub fn story(id: &str, theme: &str, participants: &[&str]) -> Story {
    Story::builder()
        .id(id)
        .theme(theme)
        .initiator_id("initiator")
        .initiator_name("Initiator")
        .participant_ids(participants.iter().map(|p| p.to_string()).collect::<Vec<_>>())
        .build()
        .unwrap()
}
