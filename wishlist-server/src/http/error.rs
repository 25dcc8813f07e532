//! API error type with IntoResponse
//!
//! Every error leaves as `{"error": "<message>"}`. Domain errors pick their
//! status from their `ErrorKind`; infrastructure details are logged and
//! replaced by a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::{ErrorKind, WishError};

const INTERNAL_MESSAGE: &str = "an internal error occurred";

/// HTTP status for each error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::Conflict => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Debug)]
pub enum ApiError {
    /// Request could not be decoded (400)
    BadRequest(&'static str),

    /// Error raised by the service or repository
    Wish(WishError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message.to_owned()),
            Self::Wish(err) => {
                let status = status_for(err.kind());
                if status.is_server_error() {
                    tracing::error!(error = %err, "request failed");
                    (status, INTERNAL_MESSAGE.to_owned())
                } else {
                    (status, err.to_string())
                }
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<WishError> for ApiError {
    fn from(e: WishError) -> Self {
        Self::Wish(e)
    }
}

/// Give the bodiless 408 from the timeout layer the usual error shape.
pub async fn timeout_as_json(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }
    tracing::warn!("request timed out");
    (
        StatusCode::REQUEST_TIMEOUT,
        Json(json!({ "error": "request timed out" })),
    )
        .into_response()
}
