use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::prelude::StoreError;

use super::{is_valid_id, object_key};
use crate::http_server::api::StatusResponse;
use crate::ServiceState;

const DEFAULT_MEDIA_TYPE: &str = "image/jpeg";

/// Serve a stored picture. Pictures are public, no token is needed.
pub async fn handler(
    State(state): State<ServiceState>,
    Path(picture_id): Path<String>,
) -> Result<impl IntoResponse, GetPictureError> {
    if !is_valid_id(&picture_id) {
        return Err(GetPictureError::NotFound(picture_id));
    }
    let data = state
        .storage()
        .get_object(&object_key(&picture_id))
        .await?
        .ok_or_else(|| GetPictureError::NotFound(picture_id.clone()))?;

    let media_type = mime_guess::from_path(&picture_id)
        .first_raw()
        .unwrap_or(DEFAULT_MEDIA_TYPE);
    Ok((StatusCode::OK, [(header::CONTENT_TYPE, media_type)], data))
}

#[derive(Debug, thiserror::Error)]
pub enum GetPictureError {
    #[error("picture not found: {0}")]
    NotFound(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for GetPictureError {
    fn into_response(self) -> Response {
        let status = match &self {
            GetPictureError::NotFound(_) => StatusCode::NOT_FOUND,
            GetPictureError::Store(_) => {
                tracing::error!(error = %self, "picture read failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(StatusResponse::failed(self.to_string()))).into_response()
    }
}
