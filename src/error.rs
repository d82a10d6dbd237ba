//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request body had no usable `url` field.
    #[error("URL is required")]
    MissingUrl,

    /// Feature extraction aborted because the URL could not be parsed.
    #[error("Could not process the URL")]
    UnprocessableUrl,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::MissingUrl => (StatusCode::BAD_REQUEST, "URL is required"),
            AppError::UnprocessableUrl => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Could not process the URL")
            }
        };

        let body = Json(json!({ "error": error_message }));

        (status, body).into_response()
    }
}
