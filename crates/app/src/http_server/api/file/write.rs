use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use common::prelude::{DriveError, TreeError, WriteOutcome};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use super::{absolute, failure};
use crate::auth::Owner;
use crate::http_server::api::client::{tree_url, ApiError, ApiRequest};
use crate::http_server::api::Status;
use crate::ServiceState;

#[derive(Debug, Clone)]
pub struct WriteRequest {
    pub path: String,
    pub content: Bytes,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteResponse {
    pub status: Status,
    /// False when an existing file was overwritten
    pub created: bool,
}

pub async fn handler(
    State(state): State<ServiceState>,
    owner: Owner,
    Path(path): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, WriteError> {
    write(&state, &owner, &absolute(&path), body).await
}

pub async fn root_handler(
    State(state): State<ServiceState>,
    owner: Owner,
    body: Bytes,
) -> Result<impl IntoResponse, WriteError> {
    write(&state, &owner, "/", body).await
}

async fn write(
    state: &ServiceState,
    owner: &Owner,
    path: &str,
    body: Bytes,
) -> Result<impl IntoResponse, WriteError> {
    let size = body.len();
    let outcome = state.drive().write(owner.as_str(), path, body).await?;
    tracing::info!(owner = owner.as_str(), path, size, ?outcome, "write");

    Ok((
        StatusCode::OK,
        Json(WriteResponse {
            status: Status::Succeed,
            created: outcome == WriteOutcome::Created,
        }),
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error(transparent)]
    Drive(#[from] DriveError),
}

impl IntoResponse for WriteError {
    fn into_response(self) -> Response {
        let WriteError::Drive(err) = self;
        match &err {
            DriveError::Tree(TreeError::NameConflict(_)) => failure(StatusCode::CONFLICT, &err),
            DriveError::NonTextContent(_) | DriveError::Tree(_) => {
                failure(StatusCode::BAD_REQUEST, &err)
            }
            DriveError::OwnerNotFound(_) => failure(StatusCode::NOT_FOUND, &err),
            _ => {
                tracing::error!(error = %err, "write failed");
                failure(StatusCode::INTERNAL_SERVER_ERROR, &err)
            }
        }
    }
}

impl ApiRequest for WriteRequest {
    type Response = WriteResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = tree_url(base_url, &["file"], &self.path)?;
        Ok(client
            .post(url)
            .query(&[("token", self.token)])
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(self.content))
    }
}
