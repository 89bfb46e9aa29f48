//! Review Store Gateway
//!
//! 评价、回复、申诉的写入与审核。每个会跨表或需要先读后写的操作都在
//! 一个 SQLite 事务内完成：要么全部提交，要么全部回滚。
//!
//! Status rules:
//! - review: 10 pending → operator audit (20/30/...) → 40 hidden via an approved appeal
//! - appeal: 10 pending → 20 approved / 30 rejected, terminal once resolved

use std::sync::Arc;

use shared::IdGenerator;
use shared::models::{
    AppealAudit, AppealCreate, AppealStatus, ReplyCreate, Review, ReviewAppeal, ReviewAudit,
    ReviewCreate, ReviewReply, ReviewStatus,
};
use shared::util::{now_datetime, page_window};
use sqlx::SqlitePool;

use crate::db::repository::{RepoError, appeal, reply, review};
use crate::error::{Resource, ServiceError, ServiceResult};

/// Highest score a review can carry
const MAX_SCORE: i32 = 5;

/// Authoritative CRUD over reviews, replies and appeals
#[derive(Clone)]
pub struct ReviewService {
    pool: SqlitePool,
    ids: Arc<IdGenerator>,
}

impl ReviewService {
    pub fn new(pool: SqlitePool, ids: Arc<IdGenerator>) -> Self {
        Self { pool, ids }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create a review; one review per order
    pub async fn create_review(&self, data: ReviewCreate) -> ServiceResult<Review> {
        tracing::debug!(order_id = data.order_id, user_id = data.user_id, "create_review");
        validate_review(&data)?;

        if review::find_by_order_id(&self.pool, data.order_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::DuplicateReview(data.order_id));
        }

        let now = now_datetime();
        let row = Review {
            review_id: self.ids.next_id(),
            order_id: data.order_id,
            user_id: data.user_id,
            store_id: data.store_id,
            sku_id: data.sku_id,
            spu_id: data.spu_id,
            score: data.score,
            service_score: data.service_score,
            express_score: data.express_score,
            has_media: data.has_media(),
            content: data.content,
            pic_info: data.pic_info,
            video_info: data.video_info,
            tags: data.tags,
            anonymous: data.anonymous,
            has_reply: false,
            status: ReviewStatus::Pending.as_db(),
            is_default: false,
            op_user: String::new(),
            op_reason: String::new(),
            op_remarks: String::new(),
            goods_snapshot: data.goods_snapshot,
            ext_json: String::new(),
            version: 0,
            create_at: now.clone(),
            update_at: now,
        };

        // A concurrent create for the same order loses on uk_review_order
        review::insert(&self.pool, &row).await.map_err(|e| match e {
            RepoError::Duplicate(_) => ServiceError::DuplicateReview(row.order_id),
            other => other.into(),
        })?;

        tracing::info!(review_id = row.review_id, order_id = row.order_id, "Review created");
        Ok(row)
    }

    pub async fn get_review(&self, review_id: i64) -> ServiceResult<Review> {
        tracing::debug!(review_id, "get_review");
        review::find_by_id(&self.pool, review_id)
            .await?
            .ok_or(ServiceError::NotFound(Resource::Review, review_id))
    }

    pub async fn get_reply(&self, review_id: i64) -> ServiceResult<ReviewReply> {
        tracing::debug!(review_id, "get_reply");
        reply::find_by_review_id(&self.pool, review_id)
            .await?
            .ok_or(ServiceError::NotFound(Resource::Reply, review_id))
    }

    /// Reviews written by a user, newest first, straight from the store
    pub async fn list_review_by_user(
        &self,
        user_id: i64,
        page: i64,
        size: i64,
    ) -> ServiceResult<Vec<Review>> {
        let (offset, limit) = page_window(page, size);
        tracing::debug!(user_id, offset, limit, "list_review_by_user");
        Ok(review::list_by_user(&self.pool, user_id, offset, limit).await?)
    }

    /// Store reply to a review
    ///
    /// The reply insert and the `has_reply` flag commit together.
    pub async fn create_reply(&self, data: ReplyCreate) -> ServiceResult<ReviewReply> {
        tracing::debug!(review_id = data.review_id, store_id = data.store_id, "create_reply");

        let mut tx = self.pool.begin().await?;

        let target = review::find_by_id(&mut *tx, data.review_id)
            .await?
            .ok_or(ServiceError::NotFound(Resource::Review, data.review_id))?;
        if target.has_reply {
            return Err(ServiceError::AlreadyReplied(data.review_id));
        }
        if target.store_id != data.store_id {
            return Err(ServiceError::Unauthorized {
                review_id: data.review_id,
                store_id: data.store_id,
            });
        }

        let now = now_datetime();
        let row = ReviewReply {
            reply_id: self.ids.next_id(),
            review_id: data.review_id,
            store_id: data.store_id,
            content: data.content,
            pic_info: data.pic_info,
            video_info: data.video_info,
            version: 0,
            create_at: now.clone(),
            update_at: now.clone(),
        };

        reply::insert(&mut *tx, &row).await.map_err(|e| match e {
            RepoError::Duplicate(_) => ServiceError::AlreadyReplied(row.review_id),
            other => other.into(),
        })?;

        if review::mark_replied(&mut *tx, row.review_id, &now).await? == 0 {
            return Err(ServiceError::AlreadyReplied(row.review_id));
        }

        tx.commit().await?;

        tracing::info!(review_id = row.review_id, reply_id = row.reply_id, "Reply created");
        Ok(row)
    }

    /// Create an appeal, or amend the pending one for the same (review, store)
    pub async fn create_appeal(&self, data: AppealCreate) -> ServiceResult<ReviewAppeal> {
        tracing::debug!(review_id = data.review_id, store_id = data.store_id, "create_appeal");

        if let Some(appeal) = self.try_create_appeal(&data).await? {
            return Ok(appeal);
        }

        // Lost the first-insert race: the row exists now, so the retry amends it
        tracing::debug!(
            review_id = data.review_id,
            store_id = data.store_id,
            "Concurrent appeal insert, retrying as update"
        );
        self.try_create_appeal(&data).await?.ok_or_else(|| {
            ServiceError::Database(format!(
                "appeal for review {} could not be written",
                data.review_id
            ))
        })
    }

    /// One transactional attempt. `Ok(None)` means the insert lost to a
    /// concurrent first submission.
    async fn try_create_appeal(&self, data: &AppealCreate) -> ServiceResult<Option<ReviewAppeal>> {
        let mut tx = self.pool.begin().await?;

        let target = review::find_by_id(&mut *tx, data.review_id)
            .await?
            .ok_or(ServiceError::NotFound(Resource::Review, data.review_id))?;
        if target.store_id != data.store_id {
            return Err(ServiceError::Unauthorized {
                review_id: data.review_id,
                store_id: data.store_id,
            });
        }

        let now = now_datetime();
        let existing = appeal::find_by_review_store(&mut *tx, data.review_id, data.store_id).await?;

        let appeal_id = match existing {
            Some(current) if current.is_resolved() => {
                return Err(ServiceError::AlreadyResolved(current.appeal_id));
            }
            Some(current) => {
                let rows = appeal::update_pending(&mut *tx, current.appeal_id, data, &now).await?;
                if rows == 0 {
                    return Err(ServiceError::AlreadyResolved(current.appeal_id));
                }
                current.appeal_id
            }
            None => {
                let row = ReviewAppeal {
                    appeal_id: self.ids.next_id(),
                    review_id: data.review_id,
                    store_id: data.store_id,
                    status: AppealStatus::Pending.as_db(),
                    reason: data.reason.clone(),
                    content: data.content.clone(),
                    pic_info: data.pic_info.clone(),
                    video_info: data.video_info.clone(),
                    op_user: String::new(),
                    op_reason: String::new(),
                    op_remarks: String::new(),
                    version: 0,
                    create_at: now.clone(),
                    update_at: now,
                };
                match appeal::insert(&mut *tx, &row).await {
                    Ok(()) => row.appeal_id,
                    Err(RepoError::Duplicate(_)) => return Ok(None),
                    Err(e) => return Err(e.into()),
                }
            }
        };

        let saved = appeal::find_by_id(&mut *tx, appeal_id)
            .await?
            .ok_or(ServiceError::NotFound(Resource::Appeal, appeal_id))?;
        tx.commit().await?;

        tracing::info!(appeal_id, review_id = saved.review_id, "Appeal saved");
        Ok(Some(saved))
    }

    /// Operator audit of a review
    pub async fn audit_review(&self, data: ReviewAudit) -> ServiceResult<()> {
        tracing::debug!(review_id = data.review_id, status = data.status.as_db(), "audit_review");

        review::update_audit(
            &self.pool,
            data.review_id,
            data.status.as_db(),
            &data.op_user,
            &data.op_reason,
            &data.op_remarks,
            &now_datetime(),
        )
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => ServiceError::NotFound(Resource::Review, data.review_id),
            other => other.into(),
        })?;

        tracing::info!(review_id = data.review_id, op_user = %data.op_user, "Review audited");
        Ok(())
    }

    /// Operator decision on an appeal
    ///
    /// Approval hides the review in the same transaction.
    pub async fn audit_appeal(&self, data: AppealAudit) -> ServiceResult<()> {
        tracing::debug!(appeal_id = data.appeal_id, status = data.status.as_db(), "audit_appeal");

        if data.status == AppealStatus::Pending {
            return Err(ServiceError::InvalidAuditStatus(data.status.as_db()));
        }

        let mut tx = self.pool.begin().await?;

        let current = appeal::find_by_id(&mut *tx, data.appeal_id)
            .await?
            .ok_or(ServiceError::NotFound(Resource::Appeal, data.appeal_id))?;
        if current.is_resolved() {
            return Err(ServiceError::AlreadyResolved(data.appeal_id));
        }

        let now = now_datetime();
        let rows = appeal::resolve(
            &mut *tx,
            data.appeal_id,
            data.status,
            &data.op_user,
            &data.op_reason,
            &data.op_remarks,
            &now,
        )
        .await?;
        if rows == 0 {
            return Err(ServiceError::AlreadyResolved(data.appeal_id));
        }

        if data.status == AppealStatus::Approved {
            review::update_status(&mut *tx, current.review_id, ReviewStatus::Hidden.as_db(), &now)
                .await
                .map_err(|e| match e {
                    RepoError::NotFound(_) => {
                        ServiceError::NotFound(Resource::Review, current.review_id)
                    }
                    other => other.into(),
                })?;
        }

        tx.commit().await?;

        tracing::info!(
            appeal_id = data.appeal_id,
            review_id = current.review_id,
            status = data.status.as_db(),
            "Appeal audited"
        );
        Ok(())
    }
}

fn validate_review(data: &ReviewCreate) -> ServiceResult<()> {
    if data.order_id <= 0 || data.user_id <= 0 || data.store_id <= 0 {
        return Err(ServiceError::Validation(
            "order_id, user_id and store_id must be positive".into(),
        ));
    }
    if !(1..=MAX_SCORE).contains(&data.score) {
        return Err(ServiceError::Validation(format!(
            "score must be between 1 and {MAX_SCORE}"
        )));
    }
    Ok(())
}
