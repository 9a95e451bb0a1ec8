//! Watch stream items delivered by the cluster client

use k8s_openapi::api::core::v1::Service;
use kube::api::WatchEvent;

/// A single notification from the Service watch stream.
///
/// Only the first three variants carry a Service. `Bookmark` and `Error`
/// are protocol-level payloads the API server may push on the same stream.
#[derive(Debug, Clone)]
pub enum WatchItem {
    /// A Service was created (or replayed when the watch starts)
    Added(Service),
    /// A Service was changed
    Modified(Service),
    /// A Service was removed
    Deleted(Service),
    /// Progress marker without an object
    Bookmark {
        /// Resource version the stream has progressed to
        resource_version: String,
    },
    /// A status object sent in place of a Service
    Error {
        /// HTTP status code of the embedded status
        code: u16,
        /// Status message
        message: String,
    },
}

impl WatchItem {
    /// Short name of the item kind, as the API server spells it.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Added(_) => "ADDED",
            Self::Modified(_) => "MODIFIED",
            Self::Deleted(_) => "DELETED",
            Self::Bookmark { .. } => "BOOKMARK",
            Self::Error { .. } => "ERROR",
        }
    }
}

impl From<WatchEvent<Service>> for WatchItem {
    fn from(event: WatchEvent<Service>) -> Self {
        match event {
            WatchEvent::Added(service) => Self::Added(service),
            WatchEvent::Modified(service) => Self::Modified(service),
            WatchEvent::Deleted(service) => Self::Deleted(service),
            WatchEvent::Bookmark(bookmark) => Self::Bookmark {
                resource_version: bookmark.metadata.resource_version,
            },
            WatchEvent::Error(status) => Self::Error {
                code: status.code,
                message: status.message.clone(),
            },
        }
    }
}
