//! HTTP-facing errors.
//!
//! Every handler failure becomes an [`ApiError`], and [`IntoResponse`] is the
//! only place a failure is turned into a status code and a JSON body of the
//! form `{"error": "<description>"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

/// Why a client request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BadRequest {
    /// Body missing, empty, not JSON, or not a JSON object.
    #[error("No JSON data received")]
    NoJsonData,
    /// The `timestamp` field is absent or null.
    #[error("Missing 'id' or 'timestamp' in the request")]
    MissingTimestamp,
}

/// A failed request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or incomplete client input.
    #[error(transparent)]
    BadRequest(#[from] BadRequest),

    /// The database could not be opened, read or written.
    #[error(transparent)]
    Storage(crate::Error),

    /// Anything else that went wrong while handling the request.
    #[error("{0}")]
    Unexpected(String),
}

impl ApiError {
    /// Create an unexpected-failure error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) | Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<crate::Error> for ApiError {
    fn from(err: crate::Error) -> Self {
        if err.is_storage_error() {
            Self::Storage(err)
        } else {
            Self::Unexpected(err.to_string())
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::unexpected(format!("storage worker failed: {err}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            error!(%status, "Request failed: {message}");
        } else {
            debug!(%status, "Rejected request: {message}");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
