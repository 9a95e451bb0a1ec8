//! Service Job Controller
//!
//! Observes a cluster and reacts to Service changes:
//! - Service watcher: prints every Service event in all namespaces and
//!   launches a one-shot Job for each one
//! - Pod poller: every 10 seconds prints the pod count of the configured
//!   namespace and looks up a fixed pod name
//!
//! Any error other than a pod lookup answered by the API server stops the
//! process with a non-zero exit status.

mod config;
mod controller;
mod error;
mod launcher;
mod logging;
mod output;
mod poller;
mod watcher;
#[cfg(test)]
mod test_utils;

use std::process::ExitCode;

use clap::Parser;
use config::Config;
use controller::Controller;
use crate::error::ControllerError;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Service Job Controller failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ControllerError> {
    let config = Config::parse();
    config.validate()?;

    info!("Starting Service Job Controller");
    info!("Configuration:");
    info!(
        "  Kubeconfig: {}",
        config
            .kubeconfig_path()
            .map_or_else(|| "in-cluster".to_string(), |path| path.display().to_string())
    );
    info!("  Namespace: {}", config.namespace);

    if rustls::crypto::ring::default_provider().install_default().is_err() {
        debug!("rustls crypto provider already installed");
    }

    // Initialize and run controller
    let controller = Controller::new(&config).await?;
    controller.run().await
}
