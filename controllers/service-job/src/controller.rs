//! Main controller implementation.
//!
//! This module contains the `Controller` struct that supervises the
//! Service watcher and the Pod poller as two independent tasks.

use crate::config::Config;
use crate::error::ControllerError;
use crate::output::{self, Output};
use crate::poller::PodPoller;
use crate::watcher::ServiceWatcher;
use cluster_client::{ClusterClientTrait, KubeClusterClient};
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

/// Main controller for the Service watcher and Pod poller.
#[derive(Debug)]
pub struct Controller {
    service_watcher: JoinHandle<Result<(), ControllerError>>,
    pod_poller: JoinHandle<Result<(), ControllerError>>,
}

impl Controller {
    /// Connects to the cluster and starts both tasks, printing to stdout.
    pub async fn new(config: &Config) -> Result<Self, ControllerError> {
        info!("Initializing Service Job Controller");

        let client = KubeClusterClient::connect(config.kubeconfig_path())
            .await
            .map_err(ControllerError::Client)?;

        Ok(Self::start(Arc::new(client), config, output::stdout(), output::stdout()))
    }

    /// Starts both tasks against an existing client.
    pub fn start(
        client: Arc<dyn ClusterClientTrait>,
        config: &Config,
        watcher_out: Output,
        poller_out: Output,
    ) -> Self {
        let watcher = ServiceWatcher::new(Arc::clone(&client), watcher_out);
        let poller = PodPoller::new(client, config, poller_out);

        let service_watcher = tokio::spawn(watcher.run());
        let pod_poller = tokio::spawn(poller.run());

        Self {
            service_watcher,
            pod_poller,
        }
    }

    /// Runs the controller until either task stops.
    ///
    /// Both tasks loop forever, so whichever ends first is fatal, even
    /// when it returned without an error.
    pub async fn run(mut self) -> Result<(), ControllerError> {
        info!("Service Job Controller running");

        let result = tokio::select! {
            result = &mut self.service_watcher => flatten("Service watcher", result),
            result = &mut self.pod_poller => flatten("Pod poller", result),
        };

        self.service_watcher.abort();
        self.pod_poller.abort();

        result
    }
}

fn flatten(
    task: &str,
    result: Result<Result<(), ControllerError>, JoinError>,
) -> Result<(), ControllerError> {
    match result {
        Ok(Ok(())) => {
            error!("{} stopped unexpectedly", task);
            Err(ControllerError::TaskFailed(format!("{task} stopped unexpectedly")))
        }
        Ok(Err(e)) => {
            error!("{} failed: {}", task, e);
            Err(e)
        }
        Err(e) => Err(ControllerError::TaskFailed(format!("{task} panicked: {e}"))),
    }
}
