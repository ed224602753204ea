use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use super::{api, form};
use crate::app::SharedState;

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
    version: &'static str,
}

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    let body_limit = state.config().max_upload_bytes();

    Router::new()
        .route("/", get(form::index))
        .route("/status", get(status_handler))
        .route("/api/stamp", post(api::stamp::stamp_upload))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn status_handler() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
