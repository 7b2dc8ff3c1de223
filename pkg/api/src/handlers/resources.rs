use axum::{
    Extension, Json,
    extract::{Path as AxumPath, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::AppState;
use crate::error::ApiError;
use kview_cluster::{AccessError, manifest::strip_managed_fields};
use kview_rbac::AuthorizationContext;
use kview_types::validate::validate_name;

/// Query parameters for listing resources.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub namespace: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FormatQuery {
    #[serde(default)]
    pub format: Option<String>,
}

/// The namespace path segment `-` denotes cluster-scoped/no-namespace.
fn segment_namespace(ns: &str) -> Option<&str> {
    if ns == "-" || ns.is_empty() { None } else { Some(ns) }
}

fn checked_name(name: &str) -> Result<(), ApiError> {
    validate_name(name)
        .map_err(|e| ApiError(AccessError::InvalidPayload(e.to_string())))
}

/// GET /api/resources/{kind}?namespace=
pub async fn list_resources(
    State(state): State<AppState>,
    AxumPath(kind): AxumPath<String>,
    Query(query): Query<ListQuery>,
    Extension(ctx): Extension<AuthorizationContext>,
) -> Result<impl IntoResponse, ApiError> {
    let namespace = query.namespace.as_deref();
    match state.accessor.list(&kind, namespace, &ctx).await {
        Ok(items) => Ok(Json(json!({"items": items}))),
        // Partial visibility (no metrics server, cluster-side denial)
        // degrades to an empty page. An unreachable cluster does not —
        // that is an outage, not an empty cluster.
        Err(AccessError::Upstream(msg)) => {
            warn!("List of '{}' degraded to empty: {}", kind, msg);
            Ok(Json(json!({"items": []})))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /api/resources/{kind}/{namespace|-}/{name}
pub async fn get_resource(
    State(state): State<AppState>,
    AxumPath((kind, ns, name)): AxumPath<(String, String, String)>,
    Extension(ctx): Extension<AuthorizationContext>,
) -> Result<impl IntoResponse, ApiError> {
    checked_name(&name)?;
    let object = state
        .accessor
        .get(&kind, segment_namespace(&ns), &name, &ctx)
        .await?;
    // The detail view only renders these three subtrees.
    Ok(Json(json!({
        "metadata": object.get("metadata").cloned().unwrap_or(Value::Null),
        "spec": object.get("spec").cloned().unwrap_or(Value::Null),
        "status": object.get("status").cloned().unwrap_or(Value::Null),
    })))
}

/// GET /api/resources/{kind}/{namespace|-}/{name}/yaml?format=yaml|json
pub async fn get_manifest(
    State(state): State<AppState>,
    AxumPath((kind, ns, name)): AxumPath<(String, String, String)>,
    Query(query): Query<FormatQuery>,
    Extension(ctx): Extension<AuthorizationContext>,
) -> Result<impl IntoResponse, ApiError> {
    checked_name(&name)?;
    let mut object = state
        .accessor
        .get(&kind, segment_namespace(&ns), &name, &ctx)
        .await?;
    strip_managed_fields(&mut object);

    let body = match query.format.as_deref() {
        Some("json") => serde_json::to_string_pretty(&object)
            .map_err(|e| ApiError(AccessError::upstream(e)))?,
        _ => serde_yaml::to_string(&object).map_err(|e| ApiError(AccessError::upstream(e)))?,
    };
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    ))
}

/// PUT /api/resources/{kind}/{namespace|-}/{name}/yaml — body is a full
/// manifest, YAML or JSON. Privileged role required (enforced by the
/// accessor before any cluster call).
pub async fn put_manifest(
    State(state): State<AppState>,
    AxumPath((kind, ns, name)): AxumPath<(String, String, String)>,
    Extension(ctx): Extension<AuthorizationContext>,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    checked_name(&name)?;
    let payload: Value = serde_yaml::from_str(&body)
        .map_err(|e| ApiError(AccessError::InvalidPayload(format!("manifest parse: {}", e))))?;
    let updated = state
        .accessor
        .update(&kind, segment_namespace(&ns), &name, payload, &ctx)
        .await?;
    Ok(Json(updated))
}

/// GET /api/resources/{kind}/{namespace|-}/{name}/events
pub async fn list_events(
    State(state): State<AppState>,
    AxumPath((_kind, ns, name)): AxumPath<(String, String, String)>,
    Extension(ctx): Extension<AuthorizationContext>,
) -> Result<impl IntoResponse, ApiError> {
    checked_name(&name)?;
    match state.accessor.events(segment_namespace(&ns), &name, &ctx).await {
        Ok(events) => Ok(Json(json!({"items": events}))),
        Err(AccessError::Upstream(msg)) => {
            warn!("Events for '{}' degraded to empty: {}", name, msg);
            Ok(Json(json!({"items": []})))
        }
        Err(e) => Err(e.into()),
    }
}
