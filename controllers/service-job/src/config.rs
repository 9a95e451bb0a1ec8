//! Command line configuration.

use std::path::Path;

use clap::Parser;

use crate::error::ControllerError;

/// Runtime configuration, passed explicitly to each component.
#[derive(Debug, Clone, Parser)]
#[command(name = "service-job-controller", version, about)]
pub struct Config {
    /// (optional) absolute path to the kubeconfig file; empty uses in-cluster credentials
    #[arg(long, default_value_t = default_kubeconfig())]
    pub kubeconfig: String,

    /// Namespace whose pods are polled
    #[arg(long, env = "WATCH_NAMESPACE", default_value = "default")]
    pub namespace: String,

    /// Print one line per pod on every poll cycle
    #[arg(long)]
    pub list_pods: bool,
}

/// `~/.kube/config` when a home directory is known, empty otherwise.
fn default_kubeconfig() -> String {
    dirs::home_dir()
        .map(|home| home.join(".kube").join("config").display().to_string())
        .unwrap_or_default()
}

impl Config {
    /// Kubeconfig path, or `None` for in-cluster credentials.
    pub fn kubeconfig_path(&self) -> Option<&Path> {
        if self.kubeconfig.is_empty() {
            None
        } else {
            Some(Path::new(&self.kubeconfig))
        }
    }

    /// Rejects values the API server would refuse anyway.
    pub fn validate(&self) -> Result<(), ControllerError> {
        if self.namespace.trim().is_empty() {
            return Err(ControllerError::InvalidConfig(
                "namespace must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
