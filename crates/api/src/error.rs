//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, error};

use phortune_shared::AppError;

/// Renders an application error as `{"error": ..., "message": ...}`.
///
/// Server-side failures are logged; their details never reach the client.
pub fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        error!(error = %err, "Request failed");
    } else {
        debug!(error = %err, status = %status, "Request rejected");
    }

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.public_message()
        })),
    )
        .into_response()
}
