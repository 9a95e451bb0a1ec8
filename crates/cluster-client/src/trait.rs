//! ClusterClient trait for mocking
//!
//! This trait abstracts the Kubernetes API calls the controller makes so
//! that the watcher, poller and launcher can run against an in-memory mock.

use crate::error::ClusterError;
use crate::models::WatchItem;
use futures::stream::BoxStream;
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::Pod;

/// Stream of Service notifications. Ends when the server closes the watch.
pub type WatchStream = BoxStream<'static, Result<WatchItem, ClusterError>>;

/// Trait for the cluster operations the controller consumes
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait ClusterClientTrait: Send + Sync {
    /// Opens a watch on Services in all namespaces, starting after `resource_version`.
    ///
    /// The returned stream is not restartable; callers open a new watch to continue.
    async fn watch_services(&self, resource_version: &str) -> Result<WatchStream, ClusterError>;

    /// Lists Pods in a namespace, in server order.
    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>, ClusterError>;

    /// Fetches a single Pod by name.
    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod, ClusterError>;

    /// Submits a Job and returns the object as stored by the server.
    async fn create_job(&self, namespace: &str, job: &Job) -> Result<Job, ClusterError>;
}
