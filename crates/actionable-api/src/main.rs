//! Actionable API Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p actionable-api
//! ```
//!
//! Configuration is loaded from environment variables, an optional `.env`
//! file, and `config/actionable.toml` for the feature settings.

use actionable_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use anyhow::Context;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        port = config.api.port,
        max_per_day = config.actionable.max_per_day,
        "Configuration loaded"
    );

    actionable_api::run(config)
        .await
        .context("server terminated with an error")?;

    Ok(())
}
