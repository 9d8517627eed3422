use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::appeals::AppealServiceError;
use crate::workflows::claims::ClaimServiceError;
use crate::workflows::RepositoryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

/// Process-level error surfaced by the CLI and server bootstrap.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Claims(ClaimServiceError),
    Appeals(AppealServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Claims(err) => write!(f, "application error: {}", err),
            AppError::Appeals(err) => write!(f, "appeal error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Claims(err) => Some(err),
            AppError::Appeals(err) => Some(err),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Claims(ClaimServiceError::Repository(RepositoryError::NotFound))
            | AppError::Appeals(AppealServiceError::Repository(RepositoryError::NotFound)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Claims(ClaimServiceError::Validation(_) | ClaimServiceError::Pipeline(_))
            | AppError::Appeals(AppealServiceError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Claims(_)
            | AppError::Appeals(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ClaimServiceError> for AppError {
    fn from(value: ClaimServiceError) -> Self {
        Self::Claims(value)
    }
}

impl From<AppealServiceError> for AppError {
    fn from(value: AppealServiceError) -> Self {
        Self::Appeals(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::claims::PipelineError;
    use crate::workflows::ValidationError;

    #[test]
    fn maps_domain_failures_to_client_errors() {
        let mismatch = AppError::from(ClaimServiceError::Pipeline(PipelineError::StageMismatch {
            expected: "SDLC".to_string(),
        }));
        assert_eq!(mismatch.status_code(), StatusCode::BAD_REQUEST);

        let missing = AppError::from(AppealServiceError::Repository(RepositoryError::NotFound));
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let invalid = AppError::from(AppealServiceError::Validation(
            ValidationError::MissingField("message"),
        ));
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn infrastructure_failures_are_internal() {
        let err = AppError::from(ConfigError::InvalidPort);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "configuration error: APP_PORT must be a valid u16"
        );
    }
}
