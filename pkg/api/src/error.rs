use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use kview_cluster::AccessError;

/// Newtype carrying the access-error taxonomy into axum's response
/// machinery: 404 NotFound, 403 Forbidden, 400 InvalidPayload,
/// 500 Upstream (with the underlying message preserved).
pub struct ApiError(pub AccessError);

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AccessError::NotFound => StatusCode::NOT_FOUND,
            AccessError::Forbidden(_) => StatusCode::FORBIDDEN,
            AccessError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            AccessError::Upstream(_) | AccessError::Unreachable(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({"error": self.0.to_string()}))).into_response()
    }
}
