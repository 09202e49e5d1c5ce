use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::prelude::DriveError;
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;

use super::{absolute, failure};
use crate::auth::Owner;
use crate::http_server::api::client::{tree_url, ApiError, ApiRequest};
use crate::http_server::api::StatusResponse;
use crate::ServiceState;

#[derive(Debug, Clone, clap::Args)]
pub struct RenameRequest {
    /// Current path of the file or folder
    pub from: String,

    /// New path, parents are created as needed
    pub to: String,

    #[arg(skip)]
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameQuery {
    #[serde(default)]
    pub newpath: Option<String>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    owner: Owner,
    Path(path): Path<String>,
    Query(query): Query<RenameQuery>,
) -> Result<Json<StatusResponse>, RenameError> {
    let from = absolute(&path);
    let Some(to) = query.newpath else {
        return Ok(Json(StatusResponse::failed("missing newpath")));
    };
    tracing::info!(owner = owner.as_str(), %from, %to, "rename");

    match state.drive().rename(owner.as_str(), &from, &to).await {
        Ok(()) => Ok(Json(StatusResponse::succeed())),
        Err(e @ (DriveError::Store(_) | DriveError::DanglingReference { .. })) => {
            Err(RenameError::Drive(e))
        }
        Err(e) => {
            tracing::debug!(owner = owner.as_str(), error = %e, "rename refused");
            Ok(Json(StatusResponse::failed(e.to_string())))
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenameError {
    #[error(transparent)]
    Drive(#[from] DriveError),
}

impl IntoResponse for RenameError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "rename failed");
        failure(StatusCode::INTERNAL_SERVER_ERROR, self)
    }
}

impl ApiRequest for RenameRequest {
    type Response = StatusResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let url = tree_url(base_url, &["rename", "file"], &self.from)?;
        Ok(client
            .post(url)
            .query(&[("token", self.token), ("newpath", self.to)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_server::api::Status;
    use bytes::Bytes;
    use common::prelude::ObjectStorage;

    #[tokio::test]
    async fn test_handler_direct() {
        let state = ServiceState::from_storage(ObjectStorage::memory());
        state.drive().create_owner("alice").await.unwrap();
        state
            .drive()
            .write("alice", "/a/x", Bytes::from("1"))
            .await
            .unwrap();
        let owner = Owner("alice".to_string());

        let Json(body) = handler(
            State(state.clone()),
            owner.clone(),
            Path("a".into()),
            Query(RenameQuery {
                newpath: Some("/b".into()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(body.status, Status::Succeed);
        assert!(state.drive().read("alice", "/b/x").await.is_ok());

        // the source is gone now, which is reported in-band
        let Json(body) = handler(
            State(state),
            owner,
            Path("a".into()),
            Query(RenameQuery {
                newpath: Some("/c".into()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(body.status, Status::Failed);
    }
}
