//! Review Reply Model

use serde::{Deserialize, Serialize};

/// Store reply to a review (`review_reply_info` row)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ReviewReply {
    pub reply_id: i64,
    pub review_id: i64,
    pub store_id: i64,
    pub content: String,
    pub pic_info: String,
    pub video_info: String,
    pub version: i32,
    pub create_at: String,
    pub update_at: String,
}

/// Create reply payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyCreate {
    pub review_id: i64,
    pub store_id: i64,
    pub content: String,
    #[serde(default)]
    pub pic_info: String,
    #[serde(default)]
    pub video_info: String,
}
