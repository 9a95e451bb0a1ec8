//! Integration tests for the cluster client
//!
//! These tests require a reachable cluster.
//! Set KUBECONFIG to a kubeconfig file path (in-cluster credentials are used otherwise).

use std::path::PathBuf;

use cluster_client::{ClusterClientTrait, KubeClusterClient};
use futures::StreamExt;

async fn connect() -> anyhow::Result<KubeClusterClient> {
    let kubeconfig = std::env::var("KUBECONFIG").ok().map(PathBuf::from);
    Ok(KubeClusterClient::connect(kubeconfig.as_deref()).await?)
}

#[tokio::test]
#[ignore] // Requires running cluster
async fn test_list_pods() -> anyhow::Result<()> {
    let client = connect().await?;

    let pods = client.list_pods("kube-system").await?;

    println!("Found {} pods", pods.len());
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_get_missing_pod_is_not_found() -> anyhow::Result<()> {
    let client = connect().await?;

    let error = client
        .get_pod("default", "example-xxxxx")
        .await
        .expect_err("pod example-xxxxx should not exist");

    assert!(error.is_not_found(), "unexpected error: {error}");
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_watch_services_replays_existing() -> anyhow::Result<()> {
    let client = connect().await?;

    let mut stream = client.watch_services("0").await?;
    // The kubernetes Service in the default namespace always exists
    let first = stream.next().await.expect("watch ended before first item")?;

    assert_eq!(first.kind(), "ADDED");
    Ok(())
}
