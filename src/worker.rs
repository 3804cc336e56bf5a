//! Worker process run inside every worker pod.
//!
//! It only reports the identity the controller injected and then listens
//! without serving any routes.

use std::net::SocketAddr;

use axum::Router;
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::info;

use crate::error::Result;
use crate::utils::shutdown_signal;

/// Environment injected into the worker container.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkerEnv {
    /// Pod name, from `WORKER_ID`.
    #[serde(default)]
    pub worker_id: Option<String>,

    /// Task number, from `TASK_NUMBER`.
    #[serde(default)]
    pub task_number: Option<String>,

    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl WorkerEnv {
    /// Load from the process environment.
    pub fn load() -> std::result::Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Startup line, e.g. `worker k8s-worker-3-abc started for 3`.
    pub fn banner(&self) -> String {
        format!(
            "worker {} started for {}",
            self.worker_id.as_deref().unwrap_or_default(),
            self.task_number.as_deref().unwrap_or_default()
        )
    }
}

/// The worker serves no routes.
pub fn router() -> Router {
    Router::new()
}

/// Log the injected identity and listen until shutdown.
pub async fn run(env: WorkerEnv) -> Result<()> {
    info!(worker_id = ?env.worker_id, task_number = ?env.task_number, "{}", env.banner());

    let addr = SocketAddr::from(([0, 0, 0, 0], env.port));
    let listener = TcpListener::bind(addr).await?;
    info!("worker listening on {}", addr);

    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
