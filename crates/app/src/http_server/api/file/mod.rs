//! Tree operations on the signed-in owner's files.
//!
//! Reads and writes answer with real status codes. Rename and delete keep
//!  the coarse contract browser clients rely on: HTTP 200 with
//!  `{"status":"failed"}` for anything the caller got wrong, 500 only when
//!  storage itself breaks.

pub mod delete;
pub mod read;
pub mod rename;
pub mod write;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::StatusResponse;

pub(crate) fn failure(status: StatusCode, message: impl ToString) -> Response {
    (status, Json(StatusResponse::failed(message.to_string()))).into_response()
}

/// Wildcard captures come without their leading slash.
pub(crate) fn absolute(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}
