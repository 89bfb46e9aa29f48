//! Review Repository

use super::{RepoError, RepoResult};
use shared::models::Review;
use sqlx::SqliteExecutor;

const COLUMNS: &str = "review_id, order_id, user_id, store_id, sku_id, spu_id, score, service_score, express_score, content, pic_info, video_info, tags, anonymous, has_media, has_reply, status, is_default, op_user, op_reason, op_remarks, goods_snapshot, ext_json, version, create_at, update_at";

pub async fn find_by_id<'e>(
    executor: impl SqliteExecutor<'e>,
    review_id: i64,
) -> RepoResult<Option<Review>> {
    let review = sqlx::query_as::<_, Review>(&format!(
        "SELECT {COLUMNS} FROM review_info WHERE review_id = ?"
    ))
    .bind(review_id)
    .fetch_optional(executor)
    .await?;
    Ok(review)
}

pub async fn find_by_order_id<'e>(
    executor: impl SqliteExecutor<'e>,
    order_id: i64,
) -> RepoResult<Option<Review>> {
    let review = sqlx::query_as::<_, Review>(&format!(
        "SELECT {COLUMNS} FROM review_info WHERE order_id = ? LIMIT 1"
    ))
    .bind(order_id)
    .fetch_optional(executor)
    .await?;
    Ok(review)
}

/// Reviews written by a user, newest first
pub async fn list_by_user<'e>(
    executor: impl SqliteExecutor<'e>,
    user_id: i64,
    offset: i64,
    limit: i64,
) -> RepoResult<Vec<Review>> {
    let reviews = sqlx::query_as::<_, Review>(&format!(
        "SELECT {COLUMNS} FROM review_info WHERE user_id = ? ORDER BY review_id DESC LIMIT ? OFFSET ?"
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await?;
    Ok(reviews)
}

/// Insert a fully populated review row
///
/// A second review for the same order hits `uk_review_order` and maps to
/// `RepoError::Duplicate`.
pub async fn insert<'e>(executor: impl SqliteExecutor<'e>, r: &Review) -> RepoResult<()> {
    sqlx::query(&format!(
        "INSERT INTO review_info ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    ))
    .bind(r.review_id)
    .bind(r.order_id)
    .bind(r.user_id)
    .bind(r.store_id)
    .bind(r.sku_id)
    .bind(r.spu_id)
    .bind(r.score)
    .bind(r.service_score)
    .bind(r.express_score)
    .bind(&r.content)
    .bind(&r.pic_info)
    .bind(&r.video_info)
    .bind(&r.tags)
    .bind(r.anonymous)
    .bind(r.has_media)
    .bind(r.has_reply)
    .bind(r.status)
    .bind(r.is_default)
    .bind(&r.op_user)
    .bind(&r.op_reason)
    .bind(&r.op_remarks)
    .bind(&r.goods_snapshot)
    .bind(&r.ext_json)
    .bind(r.version)
    .bind(&r.create_at)
    .bind(&r.update_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Operator audit: status plus operator metadata
pub async fn update_audit<'e>(
    executor: impl SqliteExecutor<'e>,
    review_id: i64,
    status: i32,
    op_user: &str,
    op_reason: &str,
    op_remarks: &str,
    now: &str,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE review_info SET status = ?1, op_user = ?2, op_reason = ?3, op_remarks = ?4, version = version + 1, update_at = ?5 WHERE review_id = ?6",
    )
    .bind(status)
    .bind(op_user)
    .bind(op_reason)
    .bind(op_remarks)
    .bind(now)
    .bind(review_id)
    .execute(executor)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Review {review_id} not found")));
    }
    Ok(())
}

pub async fn update_status<'e>(
    executor: impl SqliteExecutor<'e>,
    review_id: i64,
    status: i32,
    now: &str,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE review_info SET status = ?1, version = version + 1, update_at = ?2 WHERE review_id = ?3",
    )
    .bind(status)
    .bind(now)
    .bind(review_id)
    .execute(executor)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Review {review_id} not found")));
    }
    Ok(())
}

/// Set `has_reply`; affects nothing when the flag is already set
pub async fn mark_replied<'e>(
    executor: impl SqliteExecutor<'e>,
    review_id: i64,
    now: &str,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE review_info SET has_reply = 1, version = version + 1, update_at = ?1 WHERE review_id = ?2 AND has_reply = 0",
    )
    .bind(now)
    .bind(review_id)
    .execute(executor)
    .await?;
    Ok(rows.rows_affected())
}
