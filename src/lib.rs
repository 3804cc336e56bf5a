//! HTTP control surface for Kubernetes worker Deployments.
//!
//! Each task number maps to one Deployment named `<app>-<task>`, whose pods
//! receive the task number as `TASK_NUMBER`:
//!
//! ```text
//! POST   /workers        {"task_number": 7}  -> 201 {"name": "k8s-worker-7"}
//! GET    /workers/:name                      -> 200 <Deployment JSON>
//! DELETE /workers/:name                      -> 204
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`cluster`]: Deployment manifests and the cluster API client
//! - [`api`]: HTTP routes and handlers
//! - [`worker`]: The stub process run inside worker pods
//! - [`utils`]: Utility functions

pub mod api;
pub mod cluster;
pub mod config;
pub mod error;
pub mod utils;
pub mod worker;

pub use config::Config;
pub use error::{ApiError, ClusterError, ControllerError, Result};
