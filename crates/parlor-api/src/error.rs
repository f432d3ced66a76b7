//! HTTP rendering of application errors.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use parlor_core::error::{AppError, ErrorKind};
use parlor_core::types::ApiErrorResponse;

/// An [`AppError`] on its way out as an HTTP response.
///
/// Client errors carry their code and message. Server errors are logged in
/// full and answered with a generic `server_internal` body.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = if err.kind.is_client_error() {
            warn!(code = err.kind.code(), message = %err.message, "Request rejected");
            ApiErrorResponse {
                error: err.kind.code().to_string(),
                message: err.message,
            }
        } else {
            error!(
                code = err.kind.code(),
                error = %err,
                cause = %source_chain(&err),
                "Request failed"
            );
            ApiErrorResponse {
                error: ErrorKind::Internal.code().to_string(),
                message: "Internal server error".to_string(),
            }
        };

        (status, Json(body)).into_response()
    }
}

fn source_chain(err: &AppError) -> String {
    let mut causes = Vec::new();
    let mut current = std::error::Error::source(err);
    while let Some(cause) = current {
        causes.push(cause.to_string());
        current = cause.source();
    }
    causes.join(": ")
}
