pub mod health;
pub mod info;
pub mod variants;

use axum::{http::StatusCode, response::Json};

use crate::service::{
    server::AppState,
    types::{ErrorResponse, ServiceError},
};

/// Map a service error onto its HTTP status and body
pub(crate) fn error_reply(
    state: &AppState,
    error: ServiceError,
) -> (StatusCode, Json<ErrorResponse>) {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = if state.config.server.expose_error_details {
        error.to_response()
    } else {
        error.to_redacted_response()
    };
    (status, Json(body))
}
