use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::engine::RenderTarget;

/// Errors raised by the visualization engine itself.
///
/// Only [`EngineError::ElementMissing`] is meant to escape the engine: the
/// other variants are contained at the ingestion and validation boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Coordinate data that is not a finite number.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Numeric coordinates outside the declared sensor domain.
    #[error("sensor coordinates ({x}, {y}) outside domain {width}x{height}")]
    OutOfDomain {
        /// Offending horizontal coordinate.
        x: f64,
        /// Offending vertical coordinate.
        y: f64,
        /// Declared sensor domain width.
        width: f64,
        /// Declared sensor domain height.
        height: f64,
    },
    /// A render target required at initialization is not exposed by the surface.
    #[error("required render target `{0}` is missing")]
    ElementMissing(RenderTarget),
}

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operation cannot be performed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Engine rejected the operation.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::Engine(EngineError::ElementMissing(target)) => {
                AppError::Internal(format!("render target `{target}` is missing"))
            }
            ServiceError::Engine(other) => AppError::BadRequest(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}
