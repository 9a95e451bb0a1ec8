//! Mock ClusterClient for unit testing
//!
//! This module provides a mock implementation of `ClusterClientTrait` that can be
//! used in unit tests without requiring a running cluster.
//!
//! Pods are kept in memory per namespace, every created Job is recorded, and
//! each call to `watch_services` consumes one scripted batch of watch items.

use crate::cluster_trait::{ClusterClientTrait, WatchStream};
use crate::error::ClusterError;
use crate::models::WatchItem;
use futures::StreamExt;
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::Pod;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Failure the mock can be told to return from an operation
#[derive(Debug, Clone)]
pub enum MockFailure {
    /// 404 from the API server
    NotFound,
    /// Structured status answer
    Api {
        /// HTTP status code
        code: u16,
        /// Status reason
        reason: String,
        /// Status message
        message: String,
    },
    /// Connection-level failure
    Transport(String),
}

impl MockFailure {
    /// Shorthand for a 403 Forbidden answer with the given message
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Api {
            code: 403,
            reason: "Forbidden".to_string(),
            message: message.into(),
        }
    }

    fn to_error(&self, what: &str) -> ClusterError {
        match self {
            Self::NotFound => ClusterError::NotFound(format!("{what} not found")),
            Self::Api { code, reason, message } => ClusterError::from_status(*code, reason, message),
            Self::Transport(message) => ClusterError::Transport(message.clone().into()),
        }
    }
}

/// How a scripted watch stream finishes after its items
#[derive(Debug, Clone)]
enum BatchEnd {
    /// Stream ends cleanly, like a server-side watch timeout
    Close,
    /// Stream yields a transport error
    Fail(String),
    /// Stream stays open without yielding anything else
    Hang,
}

#[derive(Debug, Clone)]
struct WatchBatch {
    items: Vec<WatchItem>,
    end: BatchEnd,
}

/// Mock ClusterClient for testing
#[derive(Debug, Clone, Default)]
pub struct MockClusterClient {
    pods: Arc<Mutex<HashMap<String, Vec<Pod>>>>,
    jobs: Arc<Mutex<Vec<Job>>>,
    watch_batches: Arc<Mutex<VecDeque<WatchBatch>>>,
    watch_versions: Arc<Mutex<Vec<String>>>,
    list_failure: Arc<Mutex<Option<MockFailure>>>,
    lookup_failure: Arc<Mutex<Option<MockFailure>>>,
    create_job_failure: Arc<Mutex<Option<MockFailure>>>,
    unnamed_jobs: Arc<Mutex<bool>>,
    // Counter for generated Job names
    next_suffix: Arc<Mutex<u64>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockClusterClient {
    /// Create a new, empty mock client
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pod to the mock store, keyed by its metadata namespace (for test setup)
    pub fn add_pod(&self, pod: Pod) {
        let namespace = pod.metadata.namespace.clone().unwrap_or_else(|| "default".to_string());
        lock(&self.pods).entry(namespace).or_default().push(pod);
    }

    /// Queue one watch stream. The stream yields `items` then ends cleanly.
    pub fn push_watch_batch(&self, items: Vec<WatchItem>) {
        lock(&self.watch_batches).push_back(WatchBatch { items, end: BatchEnd::Close });
    }

    /// Queue one watch stream that yields `items` then fails with a transport error.
    pub fn push_failing_watch_batch(&self, items: Vec<WatchItem>, failure: impl Into<String>) {
        let end = BatchEnd::Fail(failure.into());
        lock(&self.watch_batches).push_back(WatchBatch { items, end });
    }

    /// Queue one watch stream that yields `items` then stays open forever.
    pub fn push_open_watch_batch(&self, items: Vec<WatchItem>) {
        lock(&self.watch_batches).push_back(WatchBatch { items, end: BatchEnd::Hang });
    }

    /// Make `list_pods` fail
    pub fn fail_list_pods(&self, failure: MockFailure) {
        *lock(&self.list_failure) = Some(failure);
    }

    /// Make `get_pod` fail regardless of the stored pods
    pub fn fail_get_pod(&self, failure: MockFailure) {
        *lock(&self.lookup_failure) = Some(failure);
    }

    /// Make `create_job` fail
    pub fn fail_create_job(&self, failure: MockFailure) {
        *lock(&self.create_job_failure) = Some(failure);
    }

    /// Answer `create_job` with objects that carry no name
    pub fn return_unnamed_jobs(&self) {
        *lock(&self.unnamed_jobs) = true;
    }

    /// Jobs created so far, as stored by the mock server
    #[must_use]
    pub fn created_jobs(&self) -> Vec<Job> {
        lock(&self.jobs).clone()
    }

    /// Resource versions passed to `watch_services`, in call order
    #[must_use]
    pub fn watch_versions(&self) -> Vec<String> {
        lock(&self.watch_versions).clone()
    }

    fn generate_suffix(&self) -> String {
        let mut next = lock(&self.next_suffix);
        *next += 1;
        format!("{:05}", *next)
    }
}

#[async_trait::async_trait]
impl ClusterClientTrait for MockClusterClient {
    async fn watch_services(&self, resource_version: &str) -> Result<WatchStream, ClusterError> {
        lock(&self.watch_versions).push(resource_version.to_string());
        let batch = lock(&self.watch_batches)
            .pop_front()
            .ok_or_else(|| ClusterError::Transport("no watch scripted".into()))?;
        let items = futures::stream::iter(batch.items.into_iter().map(Ok::<WatchItem, ClusterError>));
        Ok(match batch.end {
            BatchEnd::Close => items.boxed(),
            BatchEnd::Fail(message) => items
                .chain(futures::stream::once(async move {
                    Err(ClusterError::Transport(message.into()))
                }))
                .boxed(),
            BatchEnd::Hang => items.chain(futures::stream::pending()).boxed(),
        })
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>, ClusterError> {
        if let Some(failure) = lock(&self.list_failure).as_ref() {
            return Err(failure.to_error("pods"));
        }
        Ok(lock(&self.pods).get(namespace).cloned().unwrap_or_default())
    }

    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod, ClusterError> {
        if let Some(failure) = lock(&self.lookup_failure).as_ref() {
            return Err(failure.to_error(&format!("pods \"{name}\"")));
        }
        lock(&self.pods)
            .get(namespace)
            .and_then(|pods| pods.iter().find(|pod| pod.metadata.name.as_deref() == Some(name)))
            .cloned()
            .ok_or_else(|| MockFailure::NotFound.to_error(&format!("pods \"{name}\"")))
    }

    async fn create_job(&self, namespace: &str, job: &Job) -> Result<Job, ClusterError> {
        if let Some(failure) = lock(&self.create_job_failure).as_ref() {
            return Err(failure.to_error("jobs"));
        }
        let mut created = job.clone();
        let suffix = self.generate_suffix();
        let prefix = created.metadata.generate_name.clone().unwrap_or_default();
        if *lock(&self.unnamed_jobs) {
            created.metadata.name = None;
        } else if created.metadata.name.is_none() {
            created.metadata.name = Some(format!("{prefix}{suffix}"));
        }
        created.metadata.namespace = Some(namespace.to_string());
        created.metadata.uid = Some(format!("mock-uid-{suffix}"));
        lock(&self.jobs).push(created.clone());
        Ok(created)
    }
}
