//! Review Reply Repository

use super::RepoResult;
use shared::models::ReviewReply;
use sqlx::SqliteExecutor;

const COLUMNS: &str =
    "reply_id, review_id, store_id, content, pic_info, video_info, version, create_at, update_at";

pub async fn find_by_review_id<'e>(
    executor: impl SqliteExecutor<'e>,
    review_id: i64,
) -> RepoResult<Option<ReviewReply>> {
    let reply = sqlx::query_as::<_, ReviewReply>(&format!(
        "SELECT {COLUMNS} FROM review_reply_info WHERE review_id = ? LIMIT 1"
    ))
    .bind(review_id)
    .fetch_optional(executor)
    .await?;
    Ok(reply)
}

/// One reply per review is enforced by `uk_reply_review`
pub async fn insert<'e>(executor: impl SqliteExecutor<'e>, r: &ReviewReply) -> RepoResult<()> {
    sqlx::query(&format!(
        "INSERT INTO review_reply_info ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
    ))
    .bind(r.reply_id)
    .bind(r.review_id)
    .bind(r.store_id)
    .bind(&r.content)
    .bind(&r.pic_info)
    .bind(&r.video_info)
    .bind(r.version)
    .bind(&r.create_at)
    .bind(&r.update_at)
    .execute(executor)
    .await?;
    Ok(())
}
