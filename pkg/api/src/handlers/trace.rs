use axum::{
    Extension, Json,
    extract::{Path as AxumPath, State},
    response::IntoResponse,
};
use tracing::info;

use crate::AppState;
use crate::error::ApiError;
use kview_cluster::AccessError;
use kview_rbac::AuthorizationContext;
use kview_trace::Tracer;
use kview_types::trace::TraceKind;

/// GET /api/network/trace/{type}/{namespace}/{name} → {nodes, edges}
pub async fn trace_topology(
    State(state): State<AppState>,
    AxumPath((start, namespace, name)): AxumPath<(String, String, String)>,
    Extension(ctx): Extension<AuthorizationContext>,
) -> Result<impl IntoResponse, ApiError> {
    let start: TraceKind = start
        .parse()
        .map_err(|e: String| ApiError(AccessError::InvalidPayload(e)))?;

    info!("Trace {} {}/{} for {}", start, namespace, name, ctx.email);
    let graph = Tracer::new(&state.accessor)
        .trace(start, &namespace, &name, &ctx)
        .await?;
    Ok(Json(graph))
}
