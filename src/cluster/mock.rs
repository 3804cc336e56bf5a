//! Mock cluster for unit testing.
//!
//! Stores Deployments in memory and records every call so tests can assert
//! which operation ran against which namespace and name.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use kube::error::ErrorResponse;

use crate::error::ClusterError;

use super::client::DeploymentApi;

/// Operation recorded by the mock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOperation {
    /// `create`.
    Create,
    /// `get`.
    Get,
    /// `delete`.
    Delete,
}

/// A recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    /// Which operation ran.
    pub operation: MockOperation,
    /// Namespace it targeted.
    pub namespace: String,
    /// Deployment name it targeted.
    pub name: String,
}

/// Configuration for mock cluster behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Whether to fail create requests.
    pub fail_create: bool,
    /// Whether to fail get requests.
    pub fail_get: bool,
    /// Whether to fail delete requests.
    pub fail_delete: bool,
}

/// In-memory [`DeploymentApi`].
#[derive(Debug, Clone, Default)]
pub struct MockDeployments {
    config: MockConfig,
    deployments: Arc<Mutex<HashMap<(String, String), Deployment>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockDeployments {
    /// Create a new mock with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock with custom configuration.
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Seed a Deployment directly.
    pub fn insert(&self, namespace: &str, deployment: Deployment) {
        let name = deployment.metadata.name.clone().unwrap_or_default();
        self.deployments
            .lock()
            .expect("mock state poisoned")
            .insert((namespace.to_string(), name), deployment);
    }

    /// Whether a Deployment exists.
    pub fn contains(&self, namespace: &str, name: &str) -> bool {
        self.deployments
            .lock()
            .expect("mock state poisoned")
            .contains_key(&(namespace.to_string(), name.to_string()))
    }

    /// All calls recorded so far.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().expect("mock state poisoned").clone()
    }

    fn record(&self, operation: MockOperation, namespace: &str, name: &str) {
        self.calls
            .lock()
            .expect("mock state poisoned")
            .push(MockCall {
                operation,
                namespace: namespace.to_string(),
                name: name.to_string(),
            });
    }
}

fn api_error(code: u16, reason: &str, message: String) -> ClusterError {
    ClusterError::Kube(kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message,
        reason: reason.to_string(),
        code,
    }))
}

fn not_found(name: &str) -> ClusterError {
    api_error(404, "NotFound", format!("deployments.apps \"{name}\" not found"))
}

fn unavailable() -> ClusterError {
    api_error(503, "ServiceUnavailable", "mock cluster failure".to_string())
}

#[async_trait]
impl DeploymentApi for MockDeployments {
    async fn create(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, ClusterError> {
        let name = deployment.metadata.name.clone().unwrap_or_default();
        self.record(MockOperation::Create, namespace, &name);

        if self.config.fail_create {
            return Err(unavailable());
        }

        let mut deployments = self.deployments.lock().expect("mock state poisoned");
        let key = (namespace.to_string(), name.clone());
        if deployments.contains_key(&key) {
            return Err(api_error(
                409,
                "AlreadyExists",
                format!("deployments.apps \"{name}\" already exists"),
            ));
        }

        deployments.insert(key, deployment.clone());
        Ok(deployment.clone())
    }

    async fn get(&self, namespace: &str, name: &str) -> Result<Deployment, ClusterError> {
        self.record(MockOperation::Get, namespace, name);

        if self.config.fail_get {
            return Err(unavailable());
        }

        self.deployments
            .lock()
            .expect("mock state poisoned")
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| not_found(name))
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<(), ClusterError> {
        self.record(MockOperation::Delete, namespace, name);

        if self.config.fail_delete {
            return Err(unavailable());
        }

        self.deployments
            .lock()
            .expect("mock state poisoned")
            .remove(&(namespace.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or_else(|| not_found(name))
    }

    async fn server_version(&self) -> Result<String, ClusterError> {
        Ok("v0.0.0-mock".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use tokio_test::{assert_err, assert_ok};

    fn named(name: &str) -> Deployment {
        Deployment {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn mock_create_then_get() {
        let mock = MockDeployments::new();
        assert_ok!(mock.create("default", &named("w-1")).await);

        let fetched = mock.get("default", "w-1").await.unwrap();
        assert_eq!(fetched.metadata.name.as_deref(), Some("w-1"));
        assert_err!(mock.get("other", "w-1").await);
    }

    #[tokio::test]
    async fn mock_rejects_duplicate_names() {
        let mock = MockDeployments::new();
        assert_ok!(mock.create("default", &named("w-1")).await);

        let err = mock.create("default", &named("w-1")).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn mock_records_calls() {
        let mock = MockDeployments::new();
        mock.insert("jobs", named("w-2"));

        assert_ok!(mock.delete("jobs", "w-2").await);
        assert!(!mock.contains("jobs", "w-2"));

        assert_eq!(
            mock.calls(),
            vec![MockCall {
                operation: MockOperation::Delete,
                namespace: "jobs".to_string(),
                name: "w-2".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn mock_failure_modes() {
        let mock = MockDeployments::with_config(MockConfig {
            fail_get: true,
            ..Default::default()
        });
        mock.insert("default", named("w-3"));

        assert_err!(mock.get("default", "w-3").await);
        assert_ok!(mock.delete("default", "w-3").await);
    }
}
