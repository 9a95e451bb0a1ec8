//! Pod poller.
//!
//! Every cycle lists the pods of the configured namespace, prints the count,
//! then looks up a fixed pod name to show the three lookup outcomes:
//! not found, structured API error, and found. Any other failure is fatal.

use std::fmt;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use cluster_client::{ClusterClientTrait, ClusterError};
use k8s_openapi::api::core::v1::Pod;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::ControllerError;
use crate::output::Output;

/// Time between poll cycles.
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);
/// Pod name looked up on every cycle.
pub const LOOKUP_POD_NAME: &str = "example-xxxxx";

/// Namespace and name of a listed pod, printed then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodSummary {
    /// Pod namespace
    pub namespace: String,
    /// Pod name
    pub name: String,
}

impl From<&Pod> for PodSummary {
    fn from(pod: &Pod) -> Self {
        Self {
            namespace: pod.metadata.namespace.clone().unwrap_or_default(),
            name: pod.metadata.name.clone().unwrap_or_default(),
        }
    }
}

/// Recoverable result of the fixed-name lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Pod exists
    Found,
    /// API server answered 404
    NotFound,
    /// API server answered with a status; carries its message
    ApiError(String),
}

impl LookupOutcome {
    /// Sorts a lookup result into an outcome, handing back errors that carry no status.
    pub fn classify(result: Result<Pod, ClusterError>) -> Result<Self, ClusterError> {
        match result {
            Ok(_) => Ok(Self::Found),
            Err(ClusterError::NotFound(_)) => Ok(Self::NotFound),
            Err(ClusterError::Api { message, .. }) => Ok(Self::ApiError(message)),
            Err(other) => Err(other),
        }
    }
}

/// Status line for a lookup outcome.
struct LookupLine<'a> {
    outcome: &'a LookupOutcome,
    pod: &'a str,
    namespace: &'a str,
}

impl fmt::Display for LookupLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { outcome, pod, namespace } = self;
        match outcome {
            LookupOutcome::Found => write!(f, "Found pod {pod} in namespace {namespace}"),
            LookupOutcome::NotFound => write!(f, "Pod {pod} in namespace {namespace} not found"),
            LookupOutcome::ApiError(message) => {
                write!(f, "Error getting pod {pod} in namespace {namespace}: {message}")
            }
        }
    }
}

/// Polls pods in one namespace on a fixed period.
pub struct PodPoller {
    client: Arc<dyn ClusterClientTrait>,
    namespace: String,
    list_pods: bool,
    out: Output,
}

impl fmt::Debug for PodPoller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PodPoller")
            .field("namespace", &self.namespace)
            .field("list_pods", &self.list_pods)
            .finish_non_exhaustive()
    }
}

impl PodPoller {
    /// Creates a new poller for the configured namespace.
    pub fn new(client: Arc<dyn ClusterClientTrait>, config: &Config, out: Output) -> Self {
        Self {
            client,
            namespace: config.namespace.clone(),
            list_pods: config.list_pods,
            out,
        }
    }

    /// Polls forever; returns only on a fatal error.
    pub async fn run(mut self) -> Result<(), ControllerError> {
        info!("Starting Pod poller for namespace {}", self.namespace);

        loop {
            self.poll_once().await?;
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// One cycle: list, print the count, then look up the fixed pod name.
    pub async fn poll_once(&mut self) -> Result<LookupOutcome, ControllerError> {
        let pods = self
            .client
            .list_pods(&self.namespace)
            .await
            .map_err(|source| ControllerError::ListPods {
                namespace: self.namespace.clone(),
                source,
            })?;

        writeln!(self.out, "There are {} pods in the cluster", pods.len())?;
        if self.list_pods {
            for (index, summary) in pods.iter().map(PodSummary::from).enumerate() {
                writeln!(self.out, "… {:4} {:<20} {}", index, summary.namespace, summary.name)?;
            }
        }

        let lookup = self.client.get_pod(&self.namespace, LOOKUP_POD_NAME).await;
        let outcome =
            LookupOutcome::classify(lookup).map_err(|source| ControllerError::LookupPod {
                namespace: self.namespace.clone(),
                name: LOOKUP_POD_NAME.to_string(),
                source,
            })?;

        match &outcome {
            LookupOutcome::ApiError(message) => warn!("Pod lookup returned an API error: {}", message),
            other => debug!(outcome = ?other, "Pod lookup finished"),
        }

        let line = LookupLine {
            outcome: &outcome,
            pod: LOOKUP_POD_NAME,
            namespace: &self.namespace,
        };
        writeln!(self.out, "{line}")?;

        Ok(outcome)
    }
}
