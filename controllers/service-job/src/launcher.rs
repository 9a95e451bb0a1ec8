//! Job launcher.
//!
//! Builds the fixed one-shot Job and submits it. One Job is created per
//! call; the API server picks the name suffix.

use std::io::Write;
use std::sync::Arc;

use cluster_client::ClusterClientTrait;
use k8s_openapi::api::batch::v1::{Job, JobSpec};
use k8s_openapi::api::core::v1::{Container, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use tracing::{debug, info, warn};

use crate::error::ControllerError;
use crate::output::Output;

/// Namespace Jobs are created in, independent of the polled namespace.
pub const JOB_NAMESPACE: &str = "default";
/// Prefix the API server appends a random suffix to.
pub const JOB_NAME_PREFIX: &str = "prometheus-webhook-";
/// Name of the single container.
pub const JOB_CONTAINER_NAME: &str = "ansible-job";
/// Placeholder image reference.
pub const JOB_IMAGE: &str = "yourimage";
/// Seconds after completion before the cluster garbage-collects the Job.
pub const JOB_TTL_SECONDS_AFTER_FINISHED: i32 = 60;

/// The Job submitted on every trigger.
pub fn job_template() -> Job {
    Job {
        metadata: ObjectMeta {
            generate_name: Some(JOB_NAME_PREFIX.to_string()),
            namespace: Some(JOB_NAMESPACE.to_string()),
            ..Default::default()
        },
        spec: Some(JobSpec {
            ttl_seconds_after_finished: Some(JOB_TTL_SECONDS_AFTER_FINISHED),
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    generate_name: Some(JOB_NAME_PREFIX.to_string()),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: JOB_CONTAINER_NAME.to_string(),
                        image: Some(JOB_IMAGE.to_string()),
                        ..Default::default()
                    }],
                    restart_policy: Some("Never".to_string()),
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        status: None,
    }
}

/// Submits the Job template through the cluster client.
pub struct JobLauncher {
    client: Arc<dyn ClusterClientTrait>,
}

impl std::fmt::Debug for JobLauncher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobLauncher")
            .field("namespace", &JOB_NAMESPACE)
            .finish_non_exhaustive()
    }
}

impl JobLauncher {
    /// Creates a new launcher instance.
    pub fn new(client: Arc<dyn ClusterClientTrait>) -> Self {
        Self { client }
    }

    /// Creates one Job and prints its identity to `out`.
    pub async fn launch(&self, out: &mut Output) -> Result<Job, ControllerError> {
        let job = job_template();
        let created = self
            .client
            .create_job(JOB_NAMESPACE, &job)
            .await
            .map_err(ControllerError::CreateJob)?;

        let namespace = created.metadata.namespace.as_deref().unwrap_or(JOB_NAMESPACE);
        let name = match created.metadata.name.as_deref() {
            Some(name) => name,
            None => {
                warn!("API server returned Job in {} without a name", namespace);
                "<unnamed>"
            }
        };
        writeln!(out, "job {namespace}/{name} created")?;
        info!("Created Job {}/{}", namespace, name);
        debug!(uid = ?created.metadata.uid, "Job accepted by API server");

        Ok(created)
    }
}
