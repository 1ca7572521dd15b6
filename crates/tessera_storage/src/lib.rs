//! In-memory implementations of the Tessera storage traits.
//!
//! Both stores keep their records in a `HashMap` behind a `tokio` `RwLock`
//! and are cheap to clone; clones share the same data. One instance is
//! constructed per process (or per test) and injected where needed.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod agents;
mod stories;

pub use agents::InMemoryAgentDirectory;
pub use stories::InMemoryStoryRepository;
