use axum::extract::{Json, State};
use reqwest::{Client, RequestBuilder, Url};

use super::{AccountRouteError, Credentials, TokenResponse};
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::ServiceState;

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<Credentials>,
) -> Result<Json<TokenResponse>, AccountRouteError> {
    if !state.accounts().verify(&req.username, &req.password).await? {
        tracing::info!(username = %req.username, "signin refused");
        return Ok(Json(TokenResponse::refused("invalid username or password")));
    }

    tracing::info!(username = %req.username, "signin");
    let token = state.sessions().issue(&req.username);
    Ok(Json(TokenResponse::issued(token)))
}

#[derive(Debug, Clone)]
pub struct SigninRequest(pub Credentials);

impl ApiRequest for SigninRequest {
    type Response = TokenResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/signin")?;
        Ok(client.post(full_url).json(&self.0))
    }
}
