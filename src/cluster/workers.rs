//! Worker lifecycle on top of [`DeploymentApi`].

use std::sync::Arc;

use k8s_openapi::api::apps::v1::Deployment;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::error::ClusterError;

use super::client::DeploymentApi;
use super::manifest::build_deployment;
use super::types::{TaskNumber, WorkerTemplate};

/// Creates, inspects and deletes worker Deployments in one namespace.
#[derive(Clone)]
pub struct Workers {
    api: Arc<dyn DeploymentApi>,
    namespace: String,
    template: WorkerTemplate,
}

impl Workers {
    /// Create a worker service.
    pub fn new(
        api: Arc<dyn DeploymentApi>,
        namespace: impl Into<String>,
        template: WorkerTemplate,
    ) -> Self {
        Self {
            api,
            namespace: namespace.into(),
            template,
        }
    }

    /// Create a worker service using namespace and template from config.
    pub fn from_config(api: Arc<dyn DeploymentApi>, config: &Config) -> Self {
        Self::new(api, config.namespace.clone(), WorkerTemplate::from_config(config))
    }

    /// Namespace workers live in.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Deployment template.
    pub fn template(&self) -> &WorkerTemplate {
        &self.template
    }

    /// Underlying cluster API.
    pub fn api(&self) -> &Arc<dyn DeploymentApi> {
        &self.api
    }

    /// Create the Deployment for `task` and return its name.
    #[instrument(skip(self, task), fields(namespace = %self.namespace, task = %task))]
    pub async fn create_worker(&self, task: &TaskNumber) -> Result<String, ClusterError> {
        let deployment = build_deployment(&self.template, &self.namespace, task);
        let requested = deployment.metadata.name.clone().unwrap_or_default();

        let created = self.api.create(&self.namespace, &deployment).await?;
        let name = created.metadata.name.unwrap_or(requested);

        info!(%name, replicas = self.template.replicas, "worker deployment created");
        Ok(name)
    }

    /// Fetch the Deployment called `name`.
    #[instrument(skip(self), fields(namespace = %self.namespace))]
    pub async fn get_worker(&self, name: &str) -> Result<Deployment, ClusterError> {
        let deployment = self.api.get(&self.namespace, name).await?;

        let spec_replicas = deployment.spec.as_ref().and_then(|s| s.replicas);
        let available = deployment
            .status
            .as_ref()
            .and_then(|s| s.available_replicas)
            .unwrap_or(0);
        debug!(
            name = ?deployment.metadata.name,
            namespace = ?deployment.metadata.namespace,
            labels = ?deployment.metadata.labels,
            replicas = ?spec_replicas,
            available_replicas = available,
            created = ?deployment.metadata.creation_timestamp.as_ref().map(|t| t.0),
            "fetched worker deployment"
        );

        Ok(deployment)
    }

    /// Delete the Deployment called `name` and its pods.
    #[instrument(skip(self), fields(namespace = %self.namespace))]
    pub async fn delete_worker(&self, name: &str) -> Result<(), ClusterError> {
        info!("deleting deployment {} in namespace {}", name, self.namespace);
        self.api.delete(&self.namespace, name).await?;
        info!("deployment {} deleted", name);
        Ok(())
    }
}
