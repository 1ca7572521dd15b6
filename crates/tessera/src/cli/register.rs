//! `tessera register` and `tessera login-url`: OAuth onboarding.

use super::commands::RegisterArgs;
use tessera::{
    AgentDirectory, InMemoryAgentDirectory, OAuthApp, SecondMeClient, TesseraConfig,
    TesseraResult, load_agents, register_agent, save_agents,
};
use tracing::{info, instrument};

/// Exchange the code, upsert the agent and write the agents file back.
#[instrument(skip_all, fields(agents = %args.agents.display()))]
pub async fn register(config: &TesseraConfig, args: RegisterArgs) -> TesseraResult<()> {
    let oauth = OAuthApp::from_env()?;
    let client =
        SecondMeClient::new(config.client().clone().with_env_overrides())?.with_oauth(oauth);
    let directory = InMemoryAgentDirectory::with_agents(load_agents(&args.agents)?);

    let agent = register_agent(&client, &directory, &args.code).await?;

    let mut all = directory.list_all().await?;
    all.sort_by(|a, b| a.joined_at().cmp(b.joined_at()).then_with(|| a.id().cmp(b.id())));
    save_agents(&args.agents, &all)?;

    info!(agent_id = %agent.id(), total = all.len(), "Agent registered");
    println!(
        "Registered {} ({}) with {} credits",
        agent.name(),
        agent.id(),
        agent.credits()
    );
    Ok(())
}

/// Print the URL a user visits to authorize Tessera.
pub fn login_url(state: &str) -> TesseraResult<()> {
    let oauth = OAuthApp::from_env()?;
    println!("{}", oauth.authorization_url(state)?);
    Ok(())
}
