//! Application configuration loaded from environment variables.

use serde::Deserialize;

use crate::error::{ControllerError, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Cluster ===
    /// Namespace that worker Deployments are created in.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    // === Worker Template ===
    /// `app` label, container name and Deployment name prefix.
    #[serde(default = "default_worker_app")]
    pub worker_app: String,

    /// Container image run by every worker pod.
    #[serde(default = "default_worker_image")]
    pub worker_image: String,

    /// Replicas per worker Deployment.
    #[serde(default = "default_worker_replicas")]
    pub worker_replicas: i32,

    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_worker_app() -> String {
    "k8s-worker".to_string()
}

fn default_worker_image() -> String {
    "k8s-worker:1.0".to_string()
}

fn default_worker_replicas() -> i32 {
    2
}

fn default_port() -> u16 {
    9090
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            worker_app: default_worker_app(),
            worker_image: default_worker_image(),
            worker_replicas: default_worker_replicas(),
            port: default_port(),
            rust_log: default_log_level(),
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> std::result::Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<()> {
        if self.namespace.trim().is_empty() {
            return Err(ControllerError::InvalidConfig(
                "NAMESPACE must not be empty".to_string(),
            ));
        }

        if self.worker_app.trim().is_empty() {
            return Err(ControllerError::InvalidConfig(
                "WORKER_APP must not be empty".to_string(),
            ));
        }

        if self.worker_image.trim().is_empty() {
            return Err(ControllerError::InvalidConfig(
                "WORKER_IMAGE must not be empty".to_string(),
            ));
        }

        if self.worker_replicas < 0 {
            return Err(ControllerError::InvalidConfig(
                "WORKER_REPLICAS must not be negative".to_string(),
            ));
        }

        Ok(())
    }

    /// Tracing filter directives: debug for this crate when verbose,
    /// otherwise `RUST_LOG`.
    pub fn log_filter(&self, verbose: bool) -> String {
        if verbose || self.verbose {
            "workers_controller=debug,info".to_string()
        } else {
            self.rust_log.clone()
        }
    }
}
