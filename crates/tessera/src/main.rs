//! Tessera CLI binary.
//!
//! - Run an elastic demo story offline
//! - Weave a story with live SecondMe agents
//! - Onboard agents through OAuth
//! - Inspect the demo roster

use clap::Parser;
use tessera::TesseraConfig;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, list_roster, login_url, register, run_demo, weave};

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => TesseraConfig::from_file(path)?,
        None => TesseraConfig::load()?,
    };

    let format = cli.log_format.unwrap_or(*config.logging().format());
    let directive = if cli.verbose {
        "info,tessera=debug,tessera_narrative=debug,tessera_client=debug"
    } else {
        "info"
    };
    tessera::init_logging(format, directive).map_err(|e| e.to_string())?;

    match cli.command {
        Commands::Demo(args) => run_demo(&config, args).await?,
        Commands::Weave(args) => weave(&config, args).await?,
        Commands::Register(args) => register(&config, args).await?,
        Commands::LoginUrl { state } => login_url(&state)?,
        Commands::Agents { roster } => list_roster(roster.as_deref())?,
    }

    Ok(())
}
