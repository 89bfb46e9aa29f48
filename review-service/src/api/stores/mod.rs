//! Store review listing (served from the search index through the cache)

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};

use super::PageQuery;
use crate::core::ServerState;
use shared::error::{ApiResponse, AppResult};
use shared::models::ReviewPage;

pub fn router() -> Router<ServerState> {
    Router::new().route("/v1/store/{store_id}/reviews", get(list))
}

/// GET /v1/store/{store_id}/reviews?page&size - 商家的评价列表
pub async fn list(
    State(state): State<ServerState>,
    Path(store_id): Path<i64>,
    q: PageQuery,
) -> AppResult<ApiResponse<ReviewPage>> {
    let page = state
        .queries
        .list_review_by_store(store_id, q.page(), q.size())
        .await?;
    Ok(ApiResponse::success(page))
}
