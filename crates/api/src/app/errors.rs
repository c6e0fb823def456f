use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use carhub_core::DomainError;
use carhub_infra::RepositoryError;

/// Storage faults are not client errors; report them as 500 and log them.
pub fn repository_error_to_response(err: RepositoryError) -> axum::response::Response {
    tracing::error!("repository failure: {err}");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "repository_error", err.to_string())
}

/// Identifier-rule violations answer with a bare 400 (no body).
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    tracing::debug!("rejecting request: {err}");
    StatusCode::BAD_REQUEST.into_response()
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
