//! Review Appeal Repository

use super::RepoResult;
use shared::models::{AppealCreate, AppealStatus, ReviewAppeal};
use sqlx::SqliteExecutor;

const COLUMNS: &str = "appeal_id, review_id, store_id, status, reason, content, pic_info, video_info, op_user, op_reason, op_remarks, version, create_at, update_at";

pub async fn find_by_id<'e>(
    executor: impl SqliteExecutor<'e>,
    appeal_id: i64,
) -> RepoResult<Option<ReviewAppeal>> {
    let appeal = sqlx::query_as::<_, ReviewAppeal>(&format!(
        "SELECT {COLUMNS} FROM review_appeal_info WHERE appeal_id = ?"
    ))
    .bind(appeal_id)
    .fetch_optional(executor)
    .await?;
    Ok(appeal)
}

pub async fn find_by_review_store<'e>(
    executor: impl SqliteExecutor<'e>,
    review_id: i64,
    store_id: i64,
) -> RepoResult<Option<ReviewAppeal>> {
    let appeal = sqlx::query_as::<_, ReviewAppeal>(&format!(
        "SELECT {COLUMNS} FROM review_appeal_info WHERE review_id = ? AND store_id = ? LIMIT 1"
    ))
    .bind(review_id)
    .bind(store_id)
    .fetch_optional(executor)
    .await?;
    Ok(appeal)
}

/// Insert a new appeal; `uk_appeal_review_store` rejects a second row per pair
pub async fn insert<'e>(executor: impl SqliteExecutor<'e>, a: &ReviewAppeal) -> RepoResult<()> {
    sqlx::query(&format!(
        "INSERT INTO review_appeal_info ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    ))
    .bind(a.appeal_id)
    .bind(a.review_id)
    .bind(a.store_id)
    .bind(a.status)
    .bind(&a.reason)
    .bind(&a.content)
    .bind(&a.pic_info)
    .bind(&a.video_info)
    .bind(&a.op_user)
    .bind(&a.op_reason)
    .bind(&a.op_remarks)
    .bind(a.version)
    .bind(&a.create_at)
    .bind(&a.update_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Amend a pending appeal in place. Returns rows affected: 0 when the appeal
/// has been resolved in the meantime.
pub async fn update_pending<'e>(
    executor: impl SqliteExecutor<'e>,
    appeal_id: i64,
    data: &AppealCreate,
    now: &str,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE review_appeal_info SET reason = ?1, content = ?2, pic_info = ?3, video_info = ?4, version = version + 1, update_at = ?5 WHERE appeal_id = ?6 AND status = ?7",
    )
    .bind(&data.reason)
    .bind(&data.content)
    .bind(&data.pic_info)
    .bind(&data.video_info)
    .bind(now)
    .bind(appeal_id)
    .bind(AppealStatus::Pending.as_db())
    .execute(executor)
    .await?;
    Ok(rows.rows_affected())
}

/// Resolve a pending appeal. Returns rows affected: 0 when it was already resolved.
pub async fn resolve<'e>(
    executor: impl SqliteExecutor<'e>,
    appeal_id: i64,
    status: AppealStatus,
    op_user: &str,
    op_reason: &str,
    op_remarks: &str,
    now: &str,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE review_appeal_info SET status = ?1, op_user = ?2, op_reason = ?3, op_remarks = ?4, version = version + 1, update_at = ?5 WHERE appeal_id = ?6 AND status = ?7",
    )
    .bind(status.as_db())
    .bind(op_user)
    .bind(op_reason)
    .bind(op_remarks)
    .bind(now)
    .bind(appeal_id)
    .bind(AppealStatus::Pending.as_db())
    .execute(executor)
    .await?;
    Ok(rows.rows_affected())
}
