//! Cluster client errors

use std::path::PathBuf;

use kube::config::{InClusterError, KubeconfigError};
use thiserror::Error;

/// Errors that can occur when interacting with the Kubernetes API
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The kubeconfig file could not be read or resolved
    #[error("Failed to load kubeconfig {}: {source}", path.display())]
    Kubeconfig {
        /// Path that was requested
        path: PathBuf,
        /// Underlying kubeconfig error
        #[source]
        source: KubeconfigError,
    },

    /// In-cluster service account credentials are unavailable
    #[error("Failed to load in-cluster configuration: {0}")]
    InCluster(#[source] InClusterError),

    /// The HTTP client could not be built from a valid configuration
    #[error("Failed to construct Kubernetes client: {0}")]
    ClientBuild(#[source] kube::Error),

    /// The API server answered 404 for the requested object
    #[error("Not found: {0}")]
    NotFound(String),

    /// The API server answered with a structured status other than 404
    #[error("Kubernetes API error ({code} {reason}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Machine-readable reason, e.g. `Forbidden`
        reason: String,
        /// Human-readable message from the status payload
        message: String,
    },

    /// Connection, TLS or decoding failure with no status payload
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ClusterError {
    /// Classifies a status response returned by the API server.
    #[must_use]
    pub fn from_status(code: u16, reason: &str, message: &str) -> Self {
        if code == 404 {
            Self::NotFound(message.to_string())
        } else {
            Self::Api {
                code,
                reason: reason.to_string(),
                message: message.to_string(),
            }
        }
    }

    /// Returns true for a 404 answer.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// The status message carried by a structured API error, if any.
    #[must_use]
    pub fn status_message(&self) -> Option<&str> {
        match self {
            Self::NotFound(message) | Self::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl From<kube::Error> for ClusterError {
    fn from(error: kube::Error) -> Self {
        match error {
            kube::Error::Api(response) => {
                Self::from_status(response.code, &response.reason, &response.message)
            }
            other => Self::Transport(Box::new(other)),
        }
    }
}
