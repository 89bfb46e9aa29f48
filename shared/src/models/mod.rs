//! Data models
//!
//! Shared between review-service, review-job and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are snowflake `i64`.

pub mod appeal;
pub mod reply;
pub mod review;
pub mod view;

// Re-exports
pub use appeal::*;
pub use reply::*;
pub use review::*;
pub use view::*;
