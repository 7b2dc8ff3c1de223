use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::AppState;

/// GET /api/cluster/stats — the most recent sample plus the bounded
/// history the sampler has retained.
pub async fn cluster_stats(State(state): State<AppState>) -> impl IntoResponse {
    let history = state.stats.snapshot();
    let current = history.last().cloned();
    Json(json!({
        "current": current,
        "history": history,
    }))
}
