//! Cluster API client for worker Deployments.

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use kube::api::{Api, DeleteParams, PostParams};
use kube::Client;
use tracing::{debug, instrument};

use crate::error::ClusterError;

/// The Deployment operations the controller needs from a cluster.
#[async_trait]
pub trait DeploymentApi: Send + Sync {
    /// Create `deployment` in `namespace`, returning the stored object.
    async fn create(&self, namespace: &str, deployment: &Deployment)
        -> Result<Deployment, ClusterError>;

    /// Fetch a Deployment by name.
    async fn get(&self, namespace: &str, name: &str) -> Result<Deployment, ClusterError>;

    /// Delete a Deployment by name with foreground propagation.
    async fn delete(&self, namespace: &str, name: &str) -> Result<(), ClusterError>;

    /// API server version string.
    async fn server_version(&self) -> Result<String, ClusterError>;
}

/// Delete options for worker Deployments: pods go before the Deployment does.
pub fn delete_params() -> DeleteParams {
    DeleteParams::foreground()
}

/// [`DeploymentApi`] backed by a `kube` client.
#[derive(Clone)]
pub struct KubeDeployments {
    client: Client,
}

impl KubeDeployments {
    /// Wrap an existing client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect using in-cluster config, falling back to the local kubeconfig.
    pub async fn try_default() -> Result<Self, ClusterError> {
        let client = Client::try_default().await.map_err(ClusterError::Connect)?;
        Ok(Self::new(client))
    }

    fn deployments(&self, namespace: &str) -> Api<Deployment> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl DeploymentApi for KubeDeployments {
    #[instrument(skip(self, deployment), fields(name = ?deployment.metadata.name))]
    async fn create(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> Result<Deployment, ClusterError> {
        let created = self
            .deployments(namespace)
            .create(&PostParams::default(), deployment)
            .await?;
        debug!("deployment accepted by api server");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn get(&self, namespace: &str, name: &str) -> Result<Deployment, ClusterError> {
        Ok(self.deployments(namespace).get(name).await?)
    }

    #[instrument(skip(self))]
    async fn delete(&self, namespace: &str, name: &str) -> Result<(), ClusterError> {
        // Returns either the object still being finalized or a Status; both mean accepted.
        self.deployments(namespace)
            .delete(name, &delete_params())
            .await?;
        Ok(())
    }

    async fn server_version(&self) -> Result<String, ClusterError> {
        let info = self.client.apiserver_version().await?;
        Ok(info.git_version)
    }
}
