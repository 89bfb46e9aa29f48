//! Review API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/v1/review", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/{review_id}", get(handler::get_by_id))
        .route("/{review_id}/reply", get(handler::get_reply))
        .route("/reply", post(handler::create_reply))
        .route("/appeal", post(handler::create_appeal))
        .route("/audit", post(handler::audit))
}
