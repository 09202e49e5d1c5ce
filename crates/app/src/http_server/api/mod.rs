use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};

pub mod account;
pub mod client;
pub mod file;
pub mod picture;

use crate::ServiceState;

/// Outcome flag carried by every JSON response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Succeed,
    Failed,
}

/// Body of responses that carry nothing but the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn succeed() -> Self {
        Self {
            status: Status::Succeed,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: Status::Failed,
            message: Some(message.into()),
        }
    }
}

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route(
            "/file",
            get(file::read::root_handler)
                .post(file::write::root_handler)
                .delete(file::delete::root_handler),
        )
        .route(
            "/file/",
            get(file::read::root_handler)
                .post(file::write::root_handler)
                .delete(file::delete::root_handler),
        )
        .route(
            "/file/*path",
            get(file::read::handler)
                .post(file::write::handler)
                .delete(file::delete::handler),
        )
        .route("/rename/file/*path", post(file::rename::handler))
        .route("/signup", post(account::signup::handler))
        .route("/signin", post(account::signin::handler))
        .route("/signout", post(account::signout::handler))
        .route("/check", get(account::check::handler))
        .route("/picture", post(picture::upload::handler))
        .route("/picture/", post(picture::upload::handler))
        .route("/picture/:picture_id", get(picture::get::handler))
        .with_state(state)
}
