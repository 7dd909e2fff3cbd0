use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use faqgen::FaqError;
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
///
/// Every failure of a generation session is reported to the caller as a
/// `500` whose `detail` is the error message, unaltered.
#[derive(Debug)]
pub enum AppError {
    /// Errors originating from the `faqgen` pipeline.
    Faq(FaqError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

/// Conversion from `FaqError` to `AppError`.
impl From<FaqError> for AppError {
    fn from(err: FaqError) -> Self {
        AppError::Faq(err)
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
        let detail = match self {
            AppError::Faq(err) => {
                error!("FaqError: {:?}", err);
                err.to_string()
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                err.to_string()
            }
        };

        let body = Json(json!({ "detail": detail }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
