use anyhow::Result;
use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

mod prompt;
mod session;

use pm_agent::agent::Agent;
use pm_agent::product::ProductSystem;
use pm_agent::providers::anthropic::AnthropicProvider;
use pm_agent::settings::AgentSettings;
use prompt::rustyline::RustylinePrompt;
use session::Session;

/// Interactive product-management assistant backed by Claude
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {}

#[tokio::main]
async fn main() -> Result<()> {
    let _cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = match AgentSettings::new() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{} {}", style("Configuration error:").red().bold(), e);
            std::process::exit(1);
        }
    };
    tracing::debug!(model = %settings.provider.model, "loaded settings");

    let provider = AnthropicProvider::new(settings.provider_config())?;
    let mut agent = Agent::new(Box::new(provider)).with_max_turns(settings.max_turns);
    agent.add_system(Box::new(ProductSystem::default()));

    let prompt = RustylinePrompt::new()?;
    let mut session = Session::new(agent, Box::new(prompt));
    session.start().await
}
