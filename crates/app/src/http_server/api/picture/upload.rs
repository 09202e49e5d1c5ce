use std::path::Path;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use common::prelude::StoreError;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use super::object_key;
use crate::auth::Owner;
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::{Status, StatusResponse};
use crate::ServiceState;

/// Multipart field carrying the picture.
pub const FIELD_NAME: &str = "img";

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub data: Bytes,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: Status,
    /// Where the picture can be fetched, relative to the server root
    pub url: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    owner: Owner,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, UploadError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.to_string()))?
    {
        if field.name() != Some(FIELD_NAME) {
            continue;
        }

        let extension = field.file_name().and_then(extension_of);
        let data = field
            .bytes()
            .await
            .map_err(|e| UploadError::Multipart(e.to_string()))?;

        let id = picture_id(owner.as_str(), extension.as_deref());
        let size = data.len();
        state.storage().put_object(&object_key(&id), data).await?;
        tracing::info!(owner = owner.as_str(), %id, size, "picture stored");

        return Ok((
            StatusCode::OK,
            Json(UploadResponse {
                status: Status::Succeed,
                url: format!("/picture/{}", id),
            }),
        ));
    }

    Err(UploadError::MissingField)
}

fn picture_id(owner: &str, extension: Option<&str>) -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    match extension {
        Some(ext) => format!("{}_{}.{}", owner, hex, ext),
        None => format!("{}_{}", owner, hex),
    }
}

/// A short alphanumeric extension, lowercased. Anything else is dropped.
fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("multipart error: {0}")]
    Multipart(String),
    #[error("missing 'img' field")]
    MissingField,
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let status = match &self {
            UploadError::Multipart(_) | UploadError::MissingField => StatusCode::BAD_REQUEST,
            UploadError::Store(_) => {
                tracing::error!(error = %self, "picture upload failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(StatusResponse::failed(self.to_string()))).into_response()
    }
}

impl ApiRequest for UploadRequest {
    type Response = UploadResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/picture/")?;
        let part = reqwest::multipart::Part::bytes(self.data.to_vec()).file_name(self.file_name);
        let form = reqwest::multipart::Form::new().part(FIELD_NAME, part);
        Ok(client
            .post(full_url)
            .query(&[("token", self.token)])
            .multipart(form))
    }
}
