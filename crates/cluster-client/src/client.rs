//! Kubernetes API client

use std::path::Path;

use crate::cluster_trait::{ClusterClientTrait, WatchStream};
use crate::error::ClusterError;
use crate::models::WatchItem;
use futures::{StreamExt, TryStreamExt};
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::{Pod, Service};
use kube::api::{ListParams, PostParams, WatchParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config};
use tracing::debug;

/// Parameters for the Service watch. Bookmarks are not requested: the
/// stream must carry Services only.
fn watch_params() -> WatchParams {
    WatchParams::default().disable_bookmarks()
}

/// Cluster client backed by a `kube::Client`
#[derive(Clone)]
pub struct KubeClusterClient {
    client: Client,
}

impl std::fmt::Debug for KubeClusterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeClusterClient")
            .field("default_namespace", &self.client.default_namespace())
            .finish()
    }
}

impl KubeClusterClient {
    /// Wraps an existing client
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connects using the given kubeconfig file, or in-cluster credentials when `None`
    pub async fn connect(kubeconfig: Option<&Path>) -> Result<Self, ClusterError> {
        let config = match kubeconfig {
            Some(path) => {
                debug!("Loading kubeconfig from {}", path.display());
                let kubeconfig =
                    Kubeconfig::read_from(path).map_err(|source| ClusterError::Kubeconfig {
                        path: path.to_path_buf(),
                        source,
                    })?;
                Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                    .await
                    .map_err(|source| ClusterError::Kubeconfig {
                        path: path.to_path_buf(),
                        source,
                    })?
            }
            None => {
                debug!("Loading in-cluster configuration");
                Config::incluster().map_err(ClusterError::InCluster)?
            }
        };

        let client = Client::try_from(config).map_err(ClusterError::ClientBuild)?;
        Ok(Self::new(client))
    }
}

#[async_trait::async_trait]
impl ClusterClientTrait for KubeClusterClient {
    async fn watch_services(&self, resource_version: &str) -> Result<WatchStream, ClusterError> {
        let api: Api<Service> = Api::all(self.client.clone());
        debug!("Opening Service watch at resource version {}", resource_version);
        let stream = api
            .watch(&watch_params(), resource_version)
            .await?;
        Ok(stream
            .map_ok(WatchItem::from)
            .map_err(ClusterError::from)
            .boxed())
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>, ClusterError> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let pods = api.list(&ListParams::default()).await?;
        Ok(pods.items)
    }

    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod, ClusterError> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get(name).await?)
    }

    async fn create_job(&self, namespace: &str, job: &Job) -> Result<Job, ClusterError> {
        let api: Api<Job> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.create(&PostParams::default(), job).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_does_not_request_bookmarks() {
        let params = watch_params();

        assert!(!params.bookmarks);
    }
}
