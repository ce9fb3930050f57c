//! Fred ERP demo client
//!
//! Entry point for the interactive console binary.

use anyhow::Context;
use fred_client::config::Config;
use fred_client::console::{Console, Operations};
use std::io;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to stderr (stdout is the console UI)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    tracing::info!("Starting Fred client...");

    // Load configuration
    let config = Config::load_default().context("loading configuration")?;
    let runtime_config = config.to_runtime().context("validating configuration")?;

    tracing::info!(
        "OData at {} ({:?}), API at {}",
        runtime_config.odata_base_url,
        runtime_config.odata_version,
        runtime_config.api_base_url
    );

    let operations = Operations::new(runtime_config).context("creating OData client")?;

    let stdin = io::stdin();
    let mut console = Console::new(operations, stdin.lock(), io::stdout());
    console.run().await.context("running operation")?;

    tracing::info!("Bye");
    Ok(())
}
