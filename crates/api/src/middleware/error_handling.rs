//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON error bodies so every
//! endpoint reports failures the same way.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use clinic_slots_core::errors::SchedulingError;
use serde_json::json;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps a `SchedulingError` and implements `IntoResponse`, so
/// handlers can return `Result<_, AppError>` and use `?` on domain results.
#[derive(Debug)]
pub struct AppError(pub SchedulingError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            SchedulingError::NotFound(_) => StatusCode::NOT_FOUND,
            SchedulingError::Validation(_) => StatusCode::BAD_REQUEST,
            SchedulingError::Conflict(_) => StatusCode::CONFLICT,
            SchedulingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SchedulingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.0.to_string();

        if status.is_server_error() {
            error!("Request failed: {:?}", self.0);
        }

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

/// Allows `?` on `SchedulingResult` inside handlers
impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        AppError(err)
    }
}

/// Repository failures surface as database errors
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(SchedulingError::Database(err))
    }
}

/// Maps a SchedulingError straight to an HTTP response
pub fn map_error(err: SchedulingError) -> Response {
    AppError(err).into_response()
}
