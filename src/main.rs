use std::net::TcpListener;

use anyhow::Context;
use env_logger::Env;
use firmfacts::{configuration::get_configuration, services::build_provider, startup::run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().context("Failed to read configuration.")?;
    let provider = build_provider(&configuration).context("Failed to build HTTP client.")?;

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address).with_context(|| format!("Failed to bind {}", address))?;
    log::info!("Listening on {}", address);

    run(listener, provider)?.await?;
    Ok(())
}
