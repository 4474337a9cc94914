//! Rain Forecast - Main Entry Point

use forecast_api::{init_logging, run_server, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("=== Rain Forecast v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Model artifact: {}", config.model.path);

    run_server(config).await?;

    Ok(())
}
