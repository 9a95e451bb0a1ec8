//! Controller-specific error types.
//!
//! Every variant except the pod lookup outcomes handled inside the poller
//! is fatal: it propagates to `main`, which logs it and exits non-zero.

use cluster_client::ClusterError;
use thiserror::Error;

/// Errors that can occur in the Service Job Controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Credentials could not be resolved or the client could not be built
    #[error("Kubernetes client setup failed: {0}")]
    Client(#[source] ClusterError),

    /// The Service watch could not be opened
    #[error("Service watch could not be established: {0}")]
    WatchSetup(#[source] ClusterError),

    /// The Service watch stream failed mid-flight
    #[error("Service watch stream failed: {0}")]
    WatchClosed(#[source] ClusterError),

    /// The watch stream ended; it is never reopened
    #[error("Service watch stream ended")]
    WatchEnded,

    /// The watch stream delivered something other than a Service
    #[error("Unexpected watch item: {0}")]
    UnexpectedWatchItem(String),

    /// Listing pods failed
    #[error("Failed to list pods in namespace {namespace}: {source}")]
    ListPods {
        /// Namespace being polled
        namespace: String,
        /// Underlying client error
        #[source]
        source: ClusterError,
    },

    /// Pod lookup failed without a structured status
    #[error("Failed to get pod {name} in namespace {namespace}: {source}")]
    LookupPod {
        /// Namespace being polled
        namespace: String,
        /// Pod name looked up
        name: String,
        /// Underlying client error
        #[source]
        source: ClusterError,
    },

    /// Job submission failed
    #[error("Failed to create job: {0}")]
    CreateJob(#[source] ClusterError),

    /// Writing a status line failed
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// A supervised task panicked or was cancelled
    #[error("Task failed: {0}")]
    TaskFailed(String),
}
