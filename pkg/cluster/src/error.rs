use thiserror::Error;

/// The error taxonomy the HTTP layer maps to status codes.
///
/// Resolution and authorization failures are decided before any network
/// call; once a call is in flight its failure passes through as
/// `Upstream` with the server's message preserved for diagnosis.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("object not found")]
    NotFound,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("upstream cluster error: {0}")]
    Upstream(String),

    /// Transport-level failure: the cluster API could not be reached at
    /// all. Kept apart from `Upstream` so list endpoints can degrade on
    /// a cluster-side rejection without rendering an outage as an empty
    /// cluster.
    #[error("cluster unreachable: {0}")]
    Unreachable(String),
}

impl AccessError {
    pub fn upstream(err: impl std::fmt::Display) -> Self {
        AccessError::Upstream(err.to_string())
    }

    pub fn unreachable(err: impl std::fmt::Display) -> Self {
        AccessError::Unreachable(err.to_string())
    }
}
