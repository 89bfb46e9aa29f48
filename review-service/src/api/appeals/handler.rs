//! Appeal API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use shared::error::{ApiResponse, AppResult};
use shared::models::AppealAudit;

/// POST /v1/appeal/audit - 运营审核申诉
pub async fn audit(
    State(state): State<ServerState>,
    Json(payload): Json<AppealAudit>,
) -> AppResult<ApiResponse<()>> {
    state.reviews.audit_appeal(payload).await?;
    Ok(ApiResponse::ok())
}
