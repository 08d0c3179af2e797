use crate::error::{DispatchError, SetupError};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::warn;
use serde_json::json;

/// A failed request, rendered as `{"error": {"type": ..., "message": ...}}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The body is not JSON, or does not have the shape of the payload.
    #[error(transparent)]
    Body(#[from] JsonRejection),
}

impl ApiError {
    /// The status code and machine-readable type of the error.
    pub fn kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Setup(SetupError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            ApiError::Setup(SetupError::Conflict(_)) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Dispatch(DispatchError::UnknownAlgorithm(_)) => {
                (StatusCode::NOT_FOUND, "UNKNOWN_ALGORITHM")
            }
            ApiError::Dispatch(DispatchError::NoNetwork) => (StatusCode::CONFLICT, "NO_NETWORK"),
            ApiError::Body(rejection) => (rejection.status(), "BAD_REQUEST"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.kind();
        warn!("{} {}: {}", status.as_u16(), error_type, self);
        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        }));
        (status, body).into_response()
    }
}
