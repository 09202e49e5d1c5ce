use axum::extract::{Json, State};
use common::prelude::DriveError;
use reqwest::{Client, RequestBuilder, Url};

use super::{AccountRouteError, Credentials, TokenResponse};
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::ServiceState;

/// Create the account and its empty tree, then sign the new owner in.
///
/// The account only survives if its tree was created too. A tree that is
///  already there belongs to nobody new and fails the signup.
pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<Credentials>,
) -> Result<Json<TokenResponse>, AccountRouteError> {
    tracing::info!(username = %req.username, "signup");
    state.accounts().create(&req.username, &req.password).await?;

    if let Err(e) = state.drive().create_owner(&req.username).await {
        if let DriveError::OwnerExists(owner) = &e {
            tracing::warn!(%owner, "signup found an existing tree");
        }
        rollback(&state, &req.username).await;
        return Err(e.into());
    }

    let token = state.sessions().issue(&req.username);
    Ok(Json(TokenResponse::issued(token)))
}

async fn rollback(state: &ServiceState, username: &str) {
    if let Err(e) = state.accounts().remove(username).await {
        tracing::error!(username, error = %e, "failed to roll back account");
    }
}

#[derive(Debug, Clone)]
pub struct SignupRequest(pub Credentials);

impl ApiRequest for SignupRequest {
    type Response = TokenResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/signup")?;
        Ok(client.post(full_url).json(&self.0))
    }
}
