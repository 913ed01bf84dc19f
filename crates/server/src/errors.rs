use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use civdoc::MissingDocument;
use serde_json::json;
use std::any::Any;
use tracing::{error, warn};

/// A custom error type for the server application.
///
/// Only failures that end a request early live here. Collaborator failures
/// are recovered inside `civdoc` and reach the client as embedded errors.
#[derive(Debug)]
pub enum AppError {
    /// The request body is not a usable `{"base64_pdf": ...}` envelope.
    Validation(MissingDocument),
    /// The request body exceeded the configured limit.
    PayloadTooLarge,
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

/// Conversion from `MissingDocument` to `AppError`.
impl From<MissingDocument> for AppError {
    fn from(err: MissingDocument) -> Self {
        AppError::Validation(err)
    }
}

/// Conversion from `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::Validation(err) => {
                warn!("Rejected request: {err}");
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body is too large".to_string(),
            ),
            AppError::Internal(err) => {
                // Log the original error; clients only get a generic message.
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}

/// Turns a panic inside a handler into the generic 500 response.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    AppError::Internal(anyhow::anyhow!("Handler panicked: {detail}")).into_response()
}
