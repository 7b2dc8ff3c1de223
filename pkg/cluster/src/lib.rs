//! Cluster access: a thin client abstraction over the Kubernetes API
//! server plus the authorization-enforcing accessor every handler and
//! the topology tracer go through.

pub mod accessor;
pub mod client;
pub mod error;
pub mod manifest;
pub mod mock;

pub use accessor::ResourceAccessor;
pub use client::{ClusterClient, HttpClusterClient};
pub use error::AccessError;
pub use mock::MockClusterClient;
