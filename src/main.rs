//! Workers controller entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use workers_controller::api::{create_router, AppState};
use workers_controller::cluster::{DeploymentApi, KubeDeployments, WorkerTemplate, Workers};
use workers_controller::config::Config;
use workers_controller::utils::shutdown_signal;

/// HTTP control surface for Kubernetes worker Deployments.
#[derive(Parser, Debug)]
#[command(name = "workers-controller")]
#[command(about = "Create, inspect and delete worker Deployments over HTTP")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the worker API (default).
    Run,

    /// Check configuration validity.
    CheckConfig,

    /// Connect to the cluster and print the API server version.
    CheckCluster,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging; load errors are reported again by the subcommand
    let log_config = Config::load().unwrap_or_default();
    let filter = EnvFilter::new(log_config.log_filter(args.verbose));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Handle subcommands
    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::CheckCluster) => cmd_check_cluster().await,
        Some(Command::Run) | None => cmd_run(args.port).await,
    }
}

/// Load and validate configuration, failing loudly.
fn load_config() -> anyhow::Result<Config> {
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    Ok(config)
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("WORKERS CONTROLLER - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration invalid"));
        }
    }

    let template = WorkerTemplate::from_config(&config);

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Namespace: {}", config.namespace);
    println!("  Worker App: {}", template.app);
    println!("  Worker Image: {}", template.image);
    println!("  Replicas: {}", template.replicas);
    println!("  Port: {}", config.port);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Connect to the cluster and print the API server version.
async fn cmd_check_cluster() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("WORKERS CONTROLLER - CLUSTER CHECK");
    println!("======================================================================");

    print!("Connecting to cluster... ");
    let cluster = match KubeDeployments::try_default().await {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Cluster connection failed"));
        }
    };

    print!("Querying API server version... ");
    match cluster.server_version().await {
        Ok(version) => {
            println!("OK");
            println!("  Kubernetes API version: {}", version);
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("API server unreachable"));
        }
    }

    println!("======================================================================");
    println!("CLUSTER CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Serve the worker API until shutdown.
async fn cmd_run(port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let mut config = load_config()?;

    if let Some(port) = port_override {
        config.port = port;
    }

    info!("Configuration loaded successfully");
    info!("Namespace: {}", config.namespace);
    info!("Worker image: {}", config.worker_image);
    info!("Replicas per worker: {}", config.worker_replicas);

    // Connect to the cluster
    let cluster = KubeDeployments::try_default().await.map_err(|e| {
        error!("Error getting cluster configuration: {}", e);
        e
    })?;
    let version = cluster.server_version().await?;
    info!("Kubernetes API version: {}", version);

    let workers = Workers::from_config(Arc::new(cluster), &config);
    let router = create_router(AppState::new(workers));

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
