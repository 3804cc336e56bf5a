//! Integration tests against a live Kubernetes cluster.
//!
//! These tests use the local kubeconfig (or in-cluster config) and create
//! real Deployments in the `NAMESPACE` namespace (default `default`).
//! Run with: cargo test --test cluster -- --ignored

use std::sync::Arc;

use workers_controller::cluster::{KubeDeployments, TaskNumber, WorkerTemplate, Workers};
use workers_controller::config::Config;

/// Connect to the cluster, or `None` when no cluster is configured.
async fn test_workers() -> Option<Workers> {
    dotenvy::dotenv().ok();

    let config = Config::load().unwrap_or_default();
    let cluster = KubeDeployments::try_default().await.ok()?;

    Some(Workers::new(
        Arc::new(cluster),
        config.namespace.clone(),
        WorkerTemplate {
            replicas: 0,
            ..WorkerTemplate::from_config(&config)
        },
    ))
}

/// Test that the API server reports a version.
#[tokio::test]
#[ignore = "requires a Kubernetes cluster"]
async fn test_server_version() {
    let Some(workers) = test_workers().await else {
        println!("Skipping: no Kubernetes cluster configured");
        return;
    };

    let version = workers.api().server_version().await;
    assert!(version.is_ok(), "Failed to get version: {:?}", version.err());
    println!("Kubernetes API version: {}", version.unwrap());
}

/// Test the full create, get, delete cycle.
#[tokio::test]
#[ignore = "requires a Kubernetes cluster"]
async fn test_worker_lifecycle() {
    let Some(workers) = test_workers().await else {
        println!("Skipping: no Kubernetes cluster configured");
        return;
    };

    let task = TaskNumber::new("it-lifecycle").unwrap();

    let name = workers.create_worker(&task).await;
    assert!(name.is_ok(), "Failed to create worker: {:?}", name.err());
    let name = name.unwrap();
    assert_eq!(name, workers.template().deployment_name(&task));

    let deployment = workers.get_worker(&name).await;
    assert!(deployment.is_ok(), "Failed to get worker: {:?}", deployment.err());
    let labels = deployment.unwrap().metadata.labels.unwrap_or_default();
    assert_eq!(labels.get("number").map(String::as_str), Some("it-lifecycle"));

    let deleted = workers.delete_worker(&name).await;
    assert!(deleted.is_ok(), "Failed to delete worker: {:?}", deleted.err());
}

/// Test that getting an unknown worker fails.
#[tokio::test]
#[ignore = "requires a Kubernetes cluster"]
async fn test_get_missing_worker() {
    let Some(workers) = test_workers().await else {
        println!("Skipping: no Kubernetes cluster configured");
        return;
    };

    let result = workers.get_worker("k8s-worker-does-not-exist").await;
    assert!(result.is_err());
    println!("Error: {}", result.unwrap_err());
}
