use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use super::claims::pipeline::PipelineError;
use super::errors::{RepositoryError, ValidationError};

#[derive(Debug, Serialize)]
pub(crate) struct ErrorPayload {
    pub(crate) error: String,
    pub(crate) code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) expected: Option<String>,
}

pub(crate) fn error_response(status: StatusCode, code: &'static str, error: String) -> Response {
    let payload = ErrorPayload {
        error,
        code,
        expected: None,
    };
    (status, Json(payload)).into_response()
}

pub(crate) fn validation_response(error: &ValidationError) -> Response {
    error_response(StatusCode::BAD_REQUEST, "validation_error", error.to_string())
}

/// Malformed or wrongly typed request bodies answer like any other validation failure.
pub(crate) fn body_rejection_response(rejection: &JsonRejection) -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        "validation_error",
        rejection.body_text(),
    )
}

pub(crate) fn pipeline_response(error: &PipelineError) -> Response {
    let (code, expected) = match error {
        PipelineError::StageMismatch { expected } => ("stage_mismatch", Some(expected.clone())),
        PipelineError::AlreadyCanceled => ("already_canceled", None),
        PipelineError::AlreadyApproved => ("already_approved", None),
        PipelineError::UnknownAction(_) => ("unknown_action", None),
    };
    let payload = ErrorPayload {
        error: error.to_string(),
        code,
        expected,
    };
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

pub(crate) fn repository_response(error: &RepositoryError) -> Response {
    match error {
        RepositoryError::NotFound => {
            error_response(StatusCode::NOT_FOUND, "not_found", "Not found".to_string())
        }
        RepositoryError::Conflict => {
            error_response(StatusCode::CONFLICT, "conflict", error.to_string())
        }
        RepositoryError::Unavailable(_) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "unavailable",
            error.to_string(),
        ),
    }
}

/// Splits a comma separated query value, dropping blank entries.
pub(crate) fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
