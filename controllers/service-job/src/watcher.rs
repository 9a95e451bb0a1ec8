//! Service watcher.
//!
//! Consumes the Service watch stream in delivery order. Each Service event
//! prints a status line and its port list, then launches one Job. Events
//! are not filtered by kind or deduplicated.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use cluster_client::{ClusterClientTrait, WatchItem};
use futures::TryStreamExt;
use k8s_openapi::api::core::v1::{Service, ServicePort};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use tracing::{debug, info};

use crate::error::ControllerError;
use crate::launcher::JobLauncher;
use crate::output::Output;

/// Resource version the watch starts from; existing Services are replayed as `ADDED`.
const INITIAL_RESOURCE_VERSION: &str = "0";

/// Kind of change a Service event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Service created
    Added,
    /// Service changed
    Modified,
    /// Service removed
    Deleted,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Added => "ADDED",
            Self::Modified => "MODIFIED",
            Self::Deleted => "DELETED",
        };
        // Pass through padding flags
        f.pad(kind)
    }
}

/// A validated Service notification.
#[derive(Debug, Clone)]
pub struct ServiceEvent {
    /// What happened
    pub kind: EventKind,
    /// Namespace of the Service
    pub namespace: String,
    /// Name of the Service
    pub name: String,
    /// Ports from the Service spec
    pub ports: Vec<ServicePort>,
}

impl ServiceEvent {
    fn new(kind: EventKind, service: Service) -> Self {
        let metadata = service.metadata;
        Self {
            kind,
            namespace: metadata.namespace.unwrap_or_default(),
            name: metadata.name.unwrap_or_default(),
            ports: service.spec.and_then(|spec| spec.ports).unwrap_or_default(),
        }
    }
}

impl TryFrom<WatchItem> for ServiceEvent {
    type Error = ControllerError;

    fn try_from(item: WatchItem) -> Result<Self, Self::Error> {
        match item {
            WatchItem::Added(service) => Ok(Self::new(EventKind::Added, service)),
            WatchItem::Modified(service) => Ok(Self::new(EventKind::Modified, service)),
            WatchItem::Deleted(service) => Ok(Self::new(EventKind::Deleted, service)),
            WatchItem::Bookmark { resource_version } => Err(ControllerError::UnexpectedWatchItem(
                format!("expected a Service, got BOOKMARK at resource version {resource_version}"),
            )),
            WatchItem::Error { code, message } => Err(ControllerError::UnexpectedWatchItem(
                format!("expected a Service, got ERROR status {code}: {message}"),
            )),
        }
    }
}

impl fmt::Display for ServiceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "service {:>10} {:<20} {}", self.kind, self.namespace, self.name)
    }
}

/// Renders ports as `[{name protocol port targetPort nodePort} ...]`.
pub fn format_ports(ports: &[ServicePort]) -> String {
    let entries: Vec<String> = ports
        .iter()
        .map(|port| {
            let target = match &port.target_port {
                Some(IntOrString::Int(value)) => value.to_string(),
                Some(IntOrString::String(value)) => value.clone(),
                None => String::new(),
            };
            format!(
                "{{{} {} {} {} {}}}",
                port.name.as_deref().unwrap_or_default(),
                port.protocol.as_deref().unwrap_or_default(),
                port.port,
                target,
                port.node_port.unwrap_or_default(),
            )
        })
        .collect();
    format!("[{}]", entries.join(" "))
}

/// Watches Services in all namespaces and launches a Job per event.
pub struct ServiceWatcher {
    client: Arc<dyn ClusterClientTrait>,
    launcher: JobLauncher,
    out: Output,
}

impl fmt::Debug for ServiceWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceWatcher")
            .field("launcher", &self.launcher)
            .finish_non_exhaustive()
    }
}

impl ServiceWatcher {
    /// Creates a new watcher instance.
    pub fn new(client: Arc<dyn ClusterClientTrait>, out: Output) -> Self {
        let launcher = JobLauncher::new(Arc::clone(&client));
        Self {
            client,
            launcher,
            out,
        }
    }

    /// Runs for the lifetime of the watch stream; never returns `Ok`.
    ///
    /// The stream is not reopened: its end, a stream error, or an item
    /// that is not a Service all stop the watcher with an error.
    pub async fn run(mut self) -> Result<(), ControllerError> {
        info!("Starting Service watcher");

        let mut stream = self
            .client
            .watch_services(INITIAL_RESOURCE_VERSION)
            .await
            .map_err(ControllerError::WatchSetup)?;
        info!("Service watch established");

        while let Some(item) = stream.try_next().await.map_err(ControllerError::WatchClosed)? {
            self.handle(item).await?;
        }

        Err(ControllerError::WatchEnded)
    }

    /// Validates one stream item, prints it, and launches a Job.
    pub async fn handle(&mut self, item: WatchItem) -> Result<(), ControllerError> {
        let event = ServiceEvent::try_from(item)?;
        debug!(kind = %event.kind, namespace = %event.namespace, name = %event.name, "Service event");

        writeln!(self.out, "{event}")?;
        writeln!(self.out, "{}", format_ports(&event.ports))?;

        self.launcher.launch(&mut self.out).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{SharedBuffer, create_test_service, http_port};
    use cluster_client::MockClusterClient;

    fn watcher(mock: &MockClusterClient, buffer: &SharedBuffer) -> ServiceWatcher {
        ServiceWatcher::new(Arc::new(mock.clone()), buffer.output())
    }

    #[test]
    fn test_event_line_format() {
        let event = ServiceEvent::try_from(WatchItem::Added(create_test_service(
            "default",
            "kubernetes",
            "1",
            vec![],
        )))
        .unwrap();

        assert_eq!(
            event.to_string(),
            "service      ADDED default              kubernetes"
        );
    }

    #[test]
    fn test_format_ports() {
        assert_eq!(format_ports(&[]), "[]");
        assert_eq!(format_ports(&[http_port()]), "[{http TCP 80 8080 30080}]");

        let named_target = ServicePort {
            port: 443,
            target_port: Some(IntOrString::String("https".to_string())),
            ..Default::default()
        };
        assert_eq!(
            format_ports(&[http_port(), named_target]),
            "[{http TCP 80 8080 30080} {  443 https 0}]"
        );
    }

    #[tokio::test]
    async fn test_each_event_kind_prints_and_launches_one_job() {
        let mock = MockClusterClient::new();
        let buffer = SharedBuffer::default();
        let mut watcher = watcher(&mock, &buffer);

        let items = [
            WatchItem::Added(create_test_service("shop", "web", "10", vec![http_port()])),
            WatchItem::Modified(create_test_service("shop", "web", "11", vec![http_port()])),
            WatchItem::Deleted(create_test_service("shop", "web", "12", vec![http_port()])),
        ];

        for (index, item) in items.into_iter().enumerate() {
            let kind = item.kind();
            watcher.handle(item).await.unwrap();

            assert_eq!(mock.created_jobs().len(), index + 1);
            let lines = buffer.lines();
            let event_line = &lines[lines.len() - 3];
            assert!(event_line.contains(kind), "{event_line}");
            assert!(event_line.contains("shop"));
            assert!(event_line.contains("web"));
            assert_eq!(lines[lines.len() - 2], "[{http TCP 80 8080 30080}]");
            assert!(lines[lines.len() - 1].starts_with("job default/prometheus-webhook-"));
        }
    }

    #[tokio::test]
    async fn test_status_item_is_fatal_and_launches_nothing() {
        let mock = MockClusterClient::new();
        let buffer = SharedBuffer::default();
        let mut watcher = watcher(&mock, &buffer);

        let result = watcher
            .handle(WatchItem::Error { code: 410, message: "too old resource version".to_string() })
            .await;

        assert!(matches!(result, Err(ControllerError::UnexpectedWatchItem(_))));
        assert!(mock.created_jobs().is_empty());
        assert!(buffer.lines().is_empty());
    }

    #[tokio::test]
    async fn test_bookmark_is_fatal() {
        let mock = MockClusterClient::new();
        let buffer = SharedBuffer::default();
        let mut watcher = watcher(&mock, &buffer);

        let result = watcher
            .handle(WatchItem::Bookmark { resource_version: "99".to_string() })
            .await;

        assert!(matches!(result, Err(ControllerError::UnexpectedWatchItem(_))));
        assert!(mock.created_jobs().is_empty());
    }

    #[tokio::test]
    async fn test_clean_stream_close_is_fatal() {
        let mock = MockClusterClient::new();
        mock.push_watch_batch(vec![WatchItem::Added(create_test_service("a", "one", "5", vec![]))]);
        // Would keep the watcher alive if it reopened the watch
        mock.push_open_watch_batch(vec![]);
        let buffer = SharedBuffer::default();

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(1),
            watcher(&mock, &buffer).run(),
        )
        .await
        .expect("watcher should stop when the stream closes");

        assert!(matches!(result, Err(ControllerError::WatchEnded)));
        assert_eq!(mock.watch_versions(), vec!["0"]);
        assert_eq!(mock.created_jobs().len(), 1);
    }

    #[tokio::test]
    async fn test_watch_setup_failure_is_fatal() {
        let mock = MockClusterClient::new();
        let buffer = SharedBuffer::default();

        let result = watcher(&mock, &buffer).run().await;

        assert!(matches!(result, Err(ControllerError::WatchSetup(_))));
        assert!(mock.created_jobs().is_empty());
    }

    #[tokio::test]
    async fn test_stream_failure_is_fatal() {
        let mock = MockClusterClient::new();
        mock.push_failing_watch_batch(
            vec![WatchItem::Added(create_test_service("a", "one", "5", vec![]))],
            "connection reset by peer",
        );
        mock.push_watch_batch(vec![]);
        let buffer = SharedBuffer::default();

        let result = watcher(&mock, &buffer).run().await;

        assert!(matches!(result, Err(ControllerError::WatchClosed(_))));
        assert_eq!(mock.watch_versions(), vec!["0"]);
        assert_eq!(mock.created_jobs().len(), 1);
    }

    #[tokio::test]
    async fn test_type_violation_stops_the_stream() {
        let mock = MockClusterClient::new();
        mock.push_watch_batch(vec![
            WatchItem::Error { code: 500, message: "internal".to_string() },
            WatchItem::Added(create_test_service("a", "one", "5", vec![])),
        ]);
        let buffer = SharedBuffer::default();

        let result = watcher(&mock, &buffer).run().await;

        assert!(matches!(result, Err(ControllerError::UnexpectedWatchItem(_))));
        assert!(mock.created_jobs().is_empty());
    }
}
