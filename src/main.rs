mod config;
mod error;
mod event;
mod marker;
mod mirror;
mod output;
mod providers;

use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::ActionConfig;
use event::EventPayload;
use mirror::Outcome;
use providers::ado::AdoClient;
use providers::github::GitHubClient;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = format!("{err:#}");
            error!("{message}");
            output::set_failed(&message);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = ActionConfig::from_env()?;
    let payload = EventPayload::load()?;
    let (kind, item) = payload
        .item()
        .context("The event payload contains neither an issue nor a pull request")?;

    let source = GitHubClient::new(&config.github_token);
    let tracker = AdoClient::new(&config.organization, &config.ado_token);

    let outcome = mirror::run(&config, kind, item, &payload.repository, &source, &tracker).await?;

    if let Outcome::Created { id } = outcome {
        info!("Work item successfully created: {id}");
        output::set_output("id", &id.to_string())?;
    }

    Ok(())
}
