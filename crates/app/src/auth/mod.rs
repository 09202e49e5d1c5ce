//! Accounts, sessions, and the request extractor that turns a `token`
//! query parameter into the owner it was issued to.

pub mod accounts;
pub mod sessions;

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

pub use accounts::{validate_username, AccountError, Accounts};
pub use sessions::Sessions;

use crate::ServiceState;

#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    #[serde(default)]
    pub token: Option<String>,
}

/// The owner whose session token came with the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner(pub String);

impl Owner {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl FromRequestParts<ServiceState> for Owner {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<TokenQuery>::try_from_uri(&parts.uri)
            .map_err(|_| AuthError::Unauthenticated)?;
        let token = query.token.ok_or(AuthError::Unauthenticated)?;
        state
            .sessions()
            .owner(&token)
            .map(Owner)
            .ok_or(AuthError::Unauthenticated)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid token")]
    Unauthenticated,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let msg = serde_json::json!({"status": "failed", "message": self.to_string()});
        (StatusCode::UNAUTHORIZED, Json(msg)).into_response()
    }
}
