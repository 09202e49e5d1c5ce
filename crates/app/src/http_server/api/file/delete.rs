use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::prelude::DriveError;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use super::{absolute, failure};
use crate::auth::Owner;
use crate::http_server::api::client::{tree_url, ApiError, ApiRequest};
use crate::http_server::api::Status;
use crate::ServiceState;

#[derive(Debug, Clone, clap::Args)]
pub struct DeleteRequest {
    /// File or folder to delete, folders go with everything inside
    pub path: String,

    #[arg(skip)]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Number of file blobs released
    #[serde(default)]
    pub released: usize,
}

pub async fn handler(
    State(state): State<ServiceState>,
    owner: Owner,
    Path(path): Path<String>,
) -> Result<Json<DeleteResponse>, DeleteError> {
    delete(&state, &owner, &absolute(&path)).await
}

/// Always refused, the root folder is not deletable.
pub async fn root_handler(
    State(state): State<ServiceState>,
    owner: Owner,
) -> Result<Json<DeleteResponse>, DeleteError> {
    delete(&state, &owner, "/").await
}

async fn delete(
    state: &ServiceState,
    owner: &Owner,
    path: &str,
) -> Result<Json<DeleteResponse>, DeleteError> {
    tracing::info!(owner = owner.as_str(), path, "delete");
    match state.drive().delete(owner.as_str(), path).await {
        Ok(released) => Ok(Json(DeleteResponse {
            status: Status::Succeed,
            message: None,
            released,
        })),
        Err(e @ (DriveError::Store(_) | DriveError::DanglingReference { .. })) => {
            Err(DeleteError::Drive(e))
        }
        Err(e) => {
            tracing::debug!(owner = owner.as_str(), error = %e, "delete refused");
            Ok(Json(DeleteResponse {
                status: Status::Failed,
                message: Some(e.to_string()),
                released: 0,
            }))
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    #[error(transparent)]
    Drive(#[from] DriveError),
}

impl IntoResponse for DeleteError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "delete failed");
        failure(StatusCode::INTERNAL_SERVER_ERROR, self)
    }
}

impl ApiRequest for DeleteRequest {
    type Response = DeleteResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = tree_url(base_url, &["file"], &self.path)?;
        Ok(client.delete(url).query(&[("token", self.token)]))
    }
}
