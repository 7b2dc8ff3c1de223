use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::AppState;
use kview_rbac::AuthorizationContext;

/// Header the upstream auth proxy sets to the caller's email.
pub const USER_HEADER: &str = "x-remote-user";
/// Comma-separated group memberships asserted by the auth proxy.
pub const GROUPS_HEADER: &str = "x-remote-groups";

/// Middleware: derive the caller's `AuthorizationContext` from the
/// identity headers and the static assignment table. The context is
/// placed in request extensions only to hand it to the handler, which
/// threads it explicitly into every accessor call.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let email = req
        .headers()
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let groups: Vec<String> = req
        .headers()
        .get(GROUPS_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let ctx = kview_rbac::build_context(&email, &groups, &state.assignments);
    debug!(
        "Authenticated {} role={} restriction={:?}",
        ctx.email, ctx.role, ctx.namespace_restriction
    );
    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}
