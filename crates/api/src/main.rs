//! Alertmanager Gateway - Main Entry Point

use anyhow::Context;
use api::{init_logging, run_server, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args().nth(1);
    let settings = Settings::load(path.as_deref()).context("failed to load gateway settings")?;
    init_logging(&settings.log)?;

    info!("=== Alertmanager Gateway v{} ===", env!("CARGO_PKG_VERSION"));
    run_server(settings).await
}
