//! User review listing

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};

use super::PageQuery;
use crate::core::ServerState;
use shared::error::{ApiResponse, AppResult};
use shared::models::Review;

pub fn router() -> Router<ServerState> {
    Router::new().route("/v1/user/{user_id}/reviews", get(list))
}

/// GET /v1/user/{user_id}/reviews?page&size - 用户的评价列表
pub async fn list(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
    q: PageQuery,
) -> AppResult<ApiResponse<Vec<Review>>> {
    let reviews = state
        .reviews
        .list_review_by_user(user_id, q.page(), q.size())
        .await?;
    Ok(ApiResponse::success(reviews))
}
