//! Worker entry point.

use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use workers_controller::worker::{self, WorkerEnv};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let env = WorkerEnv::load().map_err(|e| {
        error!("Failed to read worker environment: {}", e);
        e
    })?;

    worker::run(env).await?;
    Ok(())
}
