//! Kubernetes Cluster Client
//!
//! The narrow slice of the Kubernetes API used by the service-job
//! controller: watching Services across all namespaces, listing and
//! fetching Pods, and creating Jobs.
//!
//! # Example
//!
//! ```no_run
//! use cluster_client::{ClusterClientTrait, KubeClusterClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // In-cluster credentials
//! let client = KubeClusterClient::connect(None).await?;
//!
//! let pods = client.list_pods("default").await?;
//! println!("There are {} pods in the cluster", pods.len());
//!
//! match client.get_pod("default", "example-xxxxx").await {
//!     Ok(_) => println!("found"),
//!     Err(e) if e.is_not_found() => println!("not found"),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Error classification**: API answers split into not-found, structured
//!   status errors, and transport failures
//! - **Mocking**: `test-util` enables an in-memory `MockClusterClient`

pub mod client;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod cluster_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::KubeClusterClient;
pub use cluster_trait::{ClusterClientTrait, WatchStream};
pub use error::ClusterError;
pub use models::WatchItem;
#[cfg(feature = "test-util")]
pub use mock::{MockClusterClient, MockFailure};
