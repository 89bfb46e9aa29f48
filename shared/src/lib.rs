//! Shared types for the review platform
//!
//! Common types used by `review-service` and `review-job`: domain models,
//! the unified error system, the change-event envelope, the ID generator and
//! the search-index client.

pub mod error;
pub mod message;
pub mod models;
pub mod search;
pub mod serde_helpers;
pub mod snowflake;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use message::{ChangeEnvelope, ChangeOperation, ChangeRow};
pub use snowflake::{IdGenError, IdGenerator};
