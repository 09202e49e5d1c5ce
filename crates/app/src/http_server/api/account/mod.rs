//! Account endpoints: sign up, sign in, sign out and token checks.

pub mod check;
pub mod signin;
pub mod signout;
pub mod signup;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::prelude::DriveError;
use serde::{Deserialize, Serialize};

use super::{Status, StatusResponse};
use crate::auth::AccountError;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Answer to sign-up and sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TokenResponse {
    fn issued(token: String) -> Self {
        Self {
            status: Status::Succeed,
            token: Some(token),
            message: None,
        }
    }

    fn refused(message: impl ToString) -> Self {
        Self {
            status: Status::Failed,
            token: None,
            message: Some(message.to_string()),
        }
    }
}

/// Account failures that are the caller's fault are answered in-band,
///  storage failures with a 500.
#[derive(Debug, thiserror::Error)]
pub enum AccountRouteError {
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error(transparent)]
    Drive(#[from] DriveError),
}

impl IntoResponse for AccountRouteError {
    fn into_response(self) -> Response {
        match &self {
            AccountRouteError::Account(
                AccountError::InvalidUsername(_)
                | AccountError::EmptyPassword
                | AccountError::UsernameTaken(_),
            )
            | AccountRouteError::Drive(DriveError::OwnerExists(_)) => {
                (StatusCode::OK, Json(TokenResponse::refused(&self))).into_response()
            }
            _ => {
                tracing::error!(error = %self, "account operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(StatusResponse::failed(self.to_string())),
                )
                    .into_response()
            }
        }
    }
}
