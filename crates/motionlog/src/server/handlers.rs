//! Request handlers.
//!
//! Both handlers open their own [`Storage`] on the blocking pool and drop it
//! before responding. Nothing is shared between requests except the
//! database path.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::error::{ApiError, BadRequest};
use super::view::render_listing;
use super::AppState;
use crate::entry::Timestamp;
use crate::storage::Storage;

/// Acknowledgement message for a stored event.
pub const INGEST_MESSAGE: &str = "Data received successfully";

/// Body of `POST /api/resource`. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IngestRequest {
    /// Absent and `null` both deserialize to `None`.
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
}

impl IngestRequest {
    /// Decode a raw request body and extract the required timestamp.
    ///
    /// # Errors
    ///
    /// - [`BadRequest::NoJsonData`] if the body is empty, not JSON, or a blank
    ///   JSON value (`null`, `false`, `0`, `""`, `[]`).
    /// - [`BadRequest::MissingTimestamp`] if `timestamp` is absent or null.
    /// - [`ApiError::Unexpected`] if the body is some other non-object value,
    ///   or `timestamp` is not a string, number or boolean, or is an integer
    ///   too large to store.
    pub fn parse(body: &[u8]) -> Result<Timestamp, ApiError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| BadRequest::NoJsonData)?;
        if is_blank(&value) {
            return Err(BadRequest::NoJsonData.into());
        }
        if !value.is_object() {
            return Err(ApiError::unexpected(format!(
                "expected a JSON object, got {}",
                describe(&value)
            )));
        }

        let request: Self =
            serde_json::from_value(value).map_err(|e| ApiError::unexpected(e.to_string()))?;
        request
            .timestamp
            .ok_or_else(|| BadRequest::MissingTimestamp.into())
    }
}

/// A JSON value that carries no data. `{}` is not blank: it is an object
/// without a timestamp.
#[allow(clippy::float_cmp)]
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(_) => false,
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Body of a successful ingest response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestResponse {
    /// Always [`INGEST_MESSAGE`].
    pub message: &'static str,
    /// The stored timestamp, echoed back.
    pub timestamp: Timestamp,
}

/// `POST /api/resource`: store one motion event.
///
/// # Errors
///
/// Returns 400 for missing or malformed input and 500 for storage or other
/// failures.
pub async fn ingest(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<IngestResponse>, ApiError> {
    let timestamp = IngestRequest::parse(&body)?;

    let path = state.database_path.clone();
    let stored = timestamp.clone();
    let id = tokio::task::spawn_blocking(move || Storage::open(path.as_path())?.insert(&stored))
        .await??;

    info!(id, "Inserted into database: timestamp={timestamp}");

    Ok(Json(IngestResponse {
        message: INGEST_MESSAGE,
        timestamp,
    }))
}

/// `GET /`: render every stored event, newest first.
///
/// # Errors
///
/// Returns 500 if the database cannot be read.
pub async fn listing(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let path = state.database_path.clone();
    let entries =
        tokio::task::spawn_blocking(move || Storage::open(path.as_path())?.list_all()).await??;

    Ok(Html(render_listing(&entries)))
}
