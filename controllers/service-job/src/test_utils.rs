//! Test utilities for unit testing the watcher, poller and launcher
//!
//! This module provides fixture builders and an in-memory output sink.

use std::io::Write;
use std::sync::{Arc, Mutex};

use k8s_openapi::api::core::v1::{Pod, Service, ServicePort};
use serde_json::json;

use crate::output::Output;

/// Output sink whose contents can be read back after the component wrote to it
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// Boxed writer feeding this buffer
    pub fn output(&self) -> Output {
        Box::new(self.clone())
    }

    /// Lines written so far
    pub fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Helper to create a test Service with the given resource version
pub fn create_test_service(
    namespace: &str,
    name: &str,
    resource_version: &str,
    ports: Vec<ServicePort>,
) -> Service {
    serde_json::from_value(json!({
        "apiVersion": "v1",
        "kind": "Service",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "resourceVersion": resource_version,
        },
        "spec": {
            "ports": ports,
        },
    }))
    .unwrap()
}

/// Helper to create a test Pod
pub fn create_test_pod(namespace: &str, name: &str) -> Pod {
    serde_json::from_value(json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": {
            "name": name,
            "namespace": namespace,
        },
        "spec": {
            "containers": [{ "name": "app", "image": "nginx" }],
        },
    }))
    .unwrap()
}

/// `http TCP 80 -> 8080`, exposed on node port 30080
pub fn http_port() -> ServicePort {
    serde_json::from_value(json!({
        "name": "http",
        "protocol": "TCP",
        "port": 80,
        "targetPort": 8080,
        "nodePort": 30080,
    }))
    .unwrap()
}
