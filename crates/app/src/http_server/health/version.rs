use axum::Json;

use common::prelude::{build_info, BuildInfo};

/// Build details of the running daemon.
pub async fn handler() -> Json<BuildInfo> {
    Json(build_info())
}
