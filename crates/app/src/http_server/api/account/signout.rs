use axum::extract::{Json, State};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::Status;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignoutRequest {
    pub token: String,
}

/// Always carries an empty token so clients can overwrite what they hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignoutResponse {
    pub token: String,
    pub status: Status,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<SignoutRequest>,
) -> Json<SignoutResponse> {
    let status = if state.sessions().revoke(&req.token) {
        Status::Succeed
    } else {
        tracing::debug!("signout with unknown token");
        Status::Failed
    };
    Json(SignoutResponse {
        token: String::new(),
        status,
    })
}

impl ApiRequest for SignoutRequest {
    type Response = SignoutResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/signout")?;
        Ok(client.post(full_url).json(&self))
    }
}
