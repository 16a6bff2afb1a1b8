//! # Channel Relay
//!
//! Entry point: sets up logging, loads configuration, then serves the
//! REST API, the real-time endpoint and the static client until stopped.

use anyhow::Result;
use tracing::info;

use channel_relay::config::Settings;
use channel_relay::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    channel_relay::telemetry::init_tracing();

    info!("Starting channel relay...");

    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        accounts = settings.accounts.len(),
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
