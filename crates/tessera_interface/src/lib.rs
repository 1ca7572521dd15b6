//! Trait definitions for the collaborators of the Tessera narrative engine.
//!
//! The orchestrator talks to three things it does not own: a story
//! repository, an agent directory, and an invocation endpoint that turns a
//! prompt into a token stream. Each is a trait here so storage and transport
//! can be swapped (in-memory for tests, HTTP for the live service).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod invoker;
mod repository;
mod stream;

pub use invoker::AgentInvoker;
pub use repository::{AgentDirectory, StoryRepository};
pub use stream::{StreamChunk, TokenStream, collect_text};
