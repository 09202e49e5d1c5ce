use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::prelude::{DriveError, Entry, Node, TreeError};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use super::{absolute, failure};
use crate::auth::Owner;
use crate::http_server::api::client::{tree_url, ApiError, ApiRequest};
use crate::http_server::api::Status;
use crate::ServiceState;

#[derive(Debug, Clone, clap::Args)]
pub struct ReadRequest {
    /// Path to read, `/` for the root folder
    #[arg(default_value = "/")]
    pub path: String,

    #[arg(skip)]
    pub token: String,
}

/// Body of a folder read. File reads answer with the raw text instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadResponse {
    pub status: Status,
    pub data: Node,
}

pub async fn handler(
    State(state): State<ServiceState>,
    owner: Owner,
    Path(path): Path<String>,
) -> Result<Response, ReadError> {
    read(&state, &owner, &absolute(&path)).await
}

pub async fn root_handler(
    State(state): State<ServiceState>,
    owner: Owner,
) -> Result<Response, ReadError> {
    read(&state, &owner, "/").await
}

async fn read(state: &ServiceState, owner: &Owner, path: &str) -> Result<Response, ReadError> {
    tracing::info!(owner = owner.as_str(), path, "read");
    match state.drive().read(owner.as_str(), path).await? {
        Entry::Folder(node) => Ok((
            StatusCode::OK,
            Json(ReadResponse {
                status: Status::Succeed,
                data: node,
            }),
        )
            .into_response()),
        Entry::File(content) => Ok((
            StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; charset=utf-8",
            )],
            content,
        )
            .into_response()),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error(transparent)]
    Drive(#[from] DriveError),
}

impl IntoResponse for ReadError {
    fn into_response(self) -> Response {
        let ReadError::Drive(err) = self;
        match &err {
            DriveError::Tree(TreeError::NotFound(_)) | DriveError::OwnerNotFound(_) => {
                failure(StatusCode::NOT_FOUND, &err)
            }
            DriveError::Tree(_) => failure(StatusCode::BAD_REQUEST, &err),
            _ => {
                tracing::error!(error = %err, "read failed");
                failure(StatusCode::INTERNAL_SERVER_ERROR, &err)
            }
        }
    }
}

impl ApiRequest for ReadRequest {
    type Response = ReadResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = tree_url(base_url, &["file"], &self.path)?;
        Ok(client.get(url).query(&[("token", self.token)]))
    }
}
