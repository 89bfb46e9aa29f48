//! Review API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use shared::error::{ApiResponse, AppResult};
use shared::models::{
    AppealCreate, ReplyCreate, Review, ReviewAppeal, ReviewAudit, ReviewCreate, ReviewReply,
};

/// POST /v1/review - 创建评价
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<ApiResponse<Review>> {
    let review = state.reviews.create_review(payload).await?;
    Ok(ApiResponse::success(review))
}

/// GET /v1/review/{review_id} - 获取评价
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(review_id): Path<i64>,
) -> AppResult<ApiResponse<Review>> {
    let review = state.reviews.get_review(review_id).await?;
    Ok(ApiResponse::success(review))
}

/// GET /v1/review/{review_id}/reply - 获取商家回复
pub async fn get_reply(
    State(state): State<ServerState>,
    Path(review_id): Path<i64>,
) -> AppResult<ApiResponse<ReviewReply>> {
    let reply = state.reviews.get_reply(review_id).await?;
    Ok(ApiResponse::success(reply))
}

/// POST /v1/review/reply - 商家回复评价
pub async fn create_reply(
    State(state): State<ServerState>,
    Json(payload): Json<ReplyCreate>,
) -> AppResult<ApiResponse<ReviewReply>> {
    let reply = state.reviews.create_reply(payload).await?;
    Ok(ApiResponse::success(reply))
}

/// POST /v1/review/appeal - 商家申诉评价
pub async fn create_appeal(
    State(state): State<ServerState>,
    Json(payload): Json<AppealCreate>,
) -> AppResult<ApiResponse<ReviewAppeal>> {
    let appeal = state.reviews.create_appeal(payload).await?;
    Ok(ApiResponse::success(appeal))
}

/// POST /v1/review/audit - 运营审核评价
pub async fn audit(
    State(state): State<ServerState>,
    Json(payload): Json<ReviewAudit>,
) -> AppResult<ApiResponse<()>> {
    state.reviews.audit_review(payload).await?;
    Ok(ApiResponse::ok())
}
