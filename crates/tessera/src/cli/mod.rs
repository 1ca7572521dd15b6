//! Command-line interface module.

mod agents;
mod commands;
mod demo;
mod register;
mod watch;
mod weave;

pub use agents::list_roster;
pub use commands::{Cli, Commands};
pub use demo::run_demo;
pub use register::{login_url, register};
pub use weave::weave;
