//! Unified service-layer error type for review-service
//!
//! `ServiceError` is the business taxonomy every gateway and query operation
//! returns. It bridges repository errors (`RepoError`, `sqlx::Error`) and index
//! errors into the API-layer error (`AppError`), so handlers only use `?`.
//!
//! The type is `Clone` because a coalesced fetch hands the same outcome to
//! every waiter.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};
use shared::search::IndexError;
use std::fmt;
use thiserror::Error;

use crate::db::repository::RepoError;

/// Entity a not-found error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Review,
    Reply,
    Appeal,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Review => f.write_str("review"),
            Resource::Reply => f.write_str("reply"),
            Resource::Appeal => f.write_str("appeal"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// A review already exists for this order
    #[error("order {0} has already been reviewed")]
    DuplicateReview(i64),

    /// The calling store does not own the review
    #[error("store {store_id} does not own review {review_id}")]
    Unauthorized { review_id: i64, store_id: i64 },

    #[error("review {0} has already been replied to")]
    AlreadyReplied(i64),

    #[error("appeal {0} has already been resolved")]
    AlreadyResolved(i64),

    #[error("{0} {1} not found")]
    NotFound(Resource, i64),

    #[error("validation failed: {0}")]
    Validation(String),

    /// Appeal audits must resolve to approved or rejected
    #[error("{0} is not a valid appeal audit status")]
    InvalidAuditStatus(i32),

    /// Cached value or indexed document could not be decoded
    #[error("decode error: {0}")]
    Decode(String),

    /// Index or cache backend unreachable
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Relational store failure; the surrounding transaction was rolled back
    #[error("database error: {0}")]
    Database(String),
}

impl From<RepoError> for ServiceError {
    fn from(err: RepoError) -> Self {
        match err {
            // NotFound/Duplicate are mapped at the call site where the entity is
            // known; reaching here means an unexpected constraint or missing row.
            RepoError::NotFound(msg) | RepoError::Duplicate(msg) | RepoError::Database(msg) => {
                ServiceError::Database(msg)
            }
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::from(err).into()
    }
}

impl From<IndexError> for ServiceError {
    fn from(err: IndexError) -> Self {
        ServiceError::UpstreamUnavailable(err.to_string())
    }
}

impl ServiceError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ServiceError::DuplicateReview(_) => ErrorCode::OrderAlreadyReviewed,
            ServiceError::Unauthorized { .. } => ErrorCode::StoreMismatch,
            ServiceError::AlreadyReplied(_) => ErrorCode::ReviewAlreadyReplied,
            ServiceError::AlreadyResolved(_) => ErrorCode::AppealAlreadyResolved,
            ServiceError::NotFound(Resource::Review, _) => ErrorCode::ReviewNotFound,
            ServiceError::NotFound(Resource::Reply, _) => ErrorCode::ReplyNotFound,
            ServiceError::NotFound(Resource::Appeal, _) => ErrorCode::AppealNotFound,
            ServiceError::Validation(_) => ErrorCode::ValidationFailed,
            ServiceError::InvalidAuditStatus(_) => ErrorCode::InvalidAuditStatus,
            ServiceError::Decode(_) => ErrorCode::DecodeError,
            ServiceError::UpstreamUnavailable(_) => ErrorCode::UpstreamUnavailable,
            ServiceError::Database(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match &err {
            ServiceError::Database(_) | ServiceError::UpstreamUnavailable(_) => {
                tracing::error!(error = %err, "Service infrastructure error");
                AppError::new(err.error_code())
            }
            ServiceError::DuplicateReview(order_id) => {
                AppError::with_message(err.error_code(), err.to_string())
                    .with_detail("order_id", *order_id)
            }
            ServiceError::Unauthorized {
                review_id,
                store_id,
            } => AppError::with_message(err.error_code(), err.to_string())
                .with_detail("review_id", *review_id)
                .with_detail("store_id", *store_id),
            _ => AppError::with_message(err.error_code(), err.to_string()),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;
