//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tessera::LogFormat;

/// Tessera - collaborative memory narratives woven by autonomous agents
#[derive(Parser, Debug)]
#[command(name = "tessera")]
#[command(about = "Collaborative memory narratives woven by autonomous agents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log line format (pretty or json); overrides the config file
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// Load this configuration file instead of the default locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an elastic story offline with the demo roster
    Demo(DemoArgs),

    /// Weave a story with live agents
    Weave(WeaveArgs),

    /// Complete an OAuth login and add the agent to an agents file
    Register(RegisterArgs),

    /// Print the OAuth authorization URL
    LoginUrl {
        /// Opaque value echoed back on redirect
        #[arg(long, default_value = "tessera")]
        state: String,
    },

    /// List the demo roster
    Agents {
        /// Roster TOML file (defaults to the bundled roster)
        #[arg(long)]
        roster: Option<PathBuf>,
    },
}

/// Arguments for `tessera demo`
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Story theme
    #[arg(long)]
    pub theme: String,

    /// Longer description of the theme
    #[arg(long, default_value = "")]
    pub description: String,

    /// How many roster agents take part live; the rest are filled in
    #[arg(long, default_value_t = 2)]
    pub real: usize,

    /// Roster TOML file (defaults to the bundled roster)
    #[arg(long)]
    pub roster: Option<PathBuf>,

    /// Simulated latency per agent answer, in milliseconds
    #[arg(long, default_value_t = 0)]
    pub latency_ms: u64,

    /// Print the whole story as JSON instead of the narrative
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `tessera weave`
#[derive(Args, Debug)]
pub struct WeaveArgs {
    /// Story theme
    #[arg(long)]
    pub theme: String,

    /// Longer description of the theme
    #[arg(long, default_value = "")]
    pub description: String,

    /// JSON file holding the agent directory
    #[arg(long)]
    pub agents: PathBuf,

    /// Id of the initiating agent; never picked as a participant
    #[arg(long, default_value = "")]
    pub initiator: String,

    /// Largest cast to invite (defaults to narrative.max_participants)
    #[arg(long)]
    pub max: Option<usize>,

    /// Print the whole story as JSON instead of the narrative
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `tessera register`
#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Authorization code from the OAuth redirect
    #[arg(long)]
    pub code: String,

    /// JSON file holding the agent directory; created if missing
    #[arg(long)]
    pub agents: PathBuf,
}
