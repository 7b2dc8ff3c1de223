pub mod error;
pub mod handlers;
pub mod identity;
pub mod request_id;
pub mod server;

use kview_cluster::ResourceAccessor;
use kview_rbac::AssignmentTable;
use kview_stats::StatsHistory;

/// Shared application state injected into all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub accessor: ResourceAccessor,
    pub assignments: AssignmentTable,
    pub stats: StatsHistory,
}
