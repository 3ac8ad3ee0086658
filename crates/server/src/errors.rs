use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::ModelError;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// JSON error body: `{ statusCode, error, message }`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: String,
    pub message: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, message: Option<String>) -> Self {
        Self { status, error: error.into(), message }
    }

    fn reason(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, status.canonical_reason().unwrap_or("Error"), Some(message.into()))
    }

    pub fn bad_request(message: impl Into<String>) -> Self { Self::reason(StatusCode::BAD_REQUEST, message) }
    pub fn unauthorized(message: impl Into<String>) -> Self { Self::reason(StatusCode::UNAUTHORIZED, message) }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let message = self.message.unwrap_or_else(|| self.error.clone());
        let body = serde_json::json!({
            "statusCode": self.status.as_u16(),
            "error": self.error,
            "message": message,
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(m) => Self::bad_request(m),
            ServiceError::Model(ModelError::Validation(m)) => Self::bad_request(m),
            ServiceError::NotFound(m) => Self::reason(StatusCode::NOT_FOUND, m),
            ServiceError::Conflict(m) => Self::reason(StatusCode::CONFLICT, m),
            other @ (ServiceError::UniqueViolation { .. } | ServiceError::Db(_) | ServiceError::Internal(_)) => {
                error!(error = %other, "request failed");
                Self::reason(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(rej: JsonRejection) -> Self {
        Self::bad_request(rej.body_text())
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(rej: PathRejection) -> Self {
        Self::bad_request(rej.body_text())
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unreachable: {0}")]
    Database(String),
}
