//! Cluster module for worker Deployments.
//!
//! This module handles:
//! - Worker types (task numbers, the Deployment template)
//! - Deployment manifest construction
//! - The cluster API seam and its `kube` implementation
//! - Mock cluster for testing

pub mod client;
pub mod manifest;
pub mod mock;
pub mod types;
pub mod workers;

pub use client::{DeploymentApi, KubeDeployments};
pub use manifest::build_deployment;
pub use mock::{MockCall, MockConfig, MockDeployments, MockOperation};
pub use types::{TaskNumber, WorkerTemplate};
pub use workers::Workers;
