use axum::extract::{Json, Query, State};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::auth::TokenQuery;
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::Status;
use crate::ServiceState;

#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Which owner, if any, a token belongs to.
pub async fn handler(
    State(state): State<ServiceState>,
    Query(query): Query<TokenQuery>,
) -> Json<CheckResponse> {
    let username = query
        .token
        .as_deref()
        .and_then(|token| state.sessions().owner(token));
    let status = if username.is_some() {
        Status::Succeed
    } else {
        Status::Failed
    };
    Json(CheckResponse { status, username })
}

impl ApiRequest for CheckRequest {
    type Response = CheckResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/check")?;
        Ok(client.get(full_url).query(&[("token", self.token)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::prelude::ObjectStorage;

    #[tokio::test]
    async fn test_handler_direct() {
        let state = ServiceState::from_storage(ObjectStorage::memory());
        let token = state.sessions().issue("alice");

        let Json(body) = handler(
            State(state.clone()),
            Query(TokenQuery { token: Some(token) }),
        )
        .await;
        assert_eq!(body.status, Status::Succeed);
        assert_eq!(body.username.as_deref(), Some("alice"));

        let Json(body) = handler(State(state), Query(TokenQuery::default())).await;
        assert_eq!(body.status, Status::Failed);
        assert!(body.username.is_none());
    }
}
