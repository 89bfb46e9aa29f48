//! Review read model served from the search index
//!
//! Documents are projected from the change stream, so every column may arrive
//! string-encoded. Optional columns default when a partial merge has not
//! populated them yet.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::serde_helpers::{
    datetime, datetime_opt, flag_lenient, i32_lenient, i64_lenient, i64_lenient_opt,
};

/// Review document as listed by store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewView {
    #[serde(deserialize_with = "i64_lenient")]
    pub review_id: i64,
    #[serde(default, deserialize_with = "i64_lenient")]
    pub order_id: i64,
    #[serde(default, deserialize_with = "i64_lenient")]
    pub user_id: i64,
    #[serde(deserialize_with = "i64_lenient")]
    pub store_id: i64,
    #[serde(default, deserialize_with = "i64_lenient")]
    pub sku_id: i64,
    #[serde(default, deserialize_with = "i64_lenient")]
    pub spu_id: i64,
    #[serde(default, deserialize_with = "i32_lenient")]
    pub score: i32,
    #[serde(default, deserialize_with = "i32_lenient")]
    pub service_score: i32,
    #[serde(default, deserialize_with = "i32_lenient")]
    pub express_score: i32,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub pic_info: String,
    #[serde(default)]
    pub video_info: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default, deserialize_with = "flag_lenient")]
    pub anonymous: bool,
    #[serde(default, deserialize_with = "flag_lenient")]
    pub has_media: bool,
    #[serde(default, deserialize_with = "flag_lenient")]
    pub has_reply: bool,
    #[serde(default, deserialize_with = "i32_lenient")]
    pub status: i32,
    #[serde(deserialize_with = "datetime")]
    pub create_at: NaiveDateTime,
    #[serde(default, deserialize_with = "datetime_opt")]
    pub update_at: Option<NaiveDateTime>,

    // Reply projection, present once the store has replied
    #[serde(default, deserialize_with = "i64_lenient_opt")]
    pub reply_id: Option<i64>,
    #[serde(default)]
    pub reply_content: Option<String>,
    #[serde(default)]
    pub reply_pic_info: Option<String>,
    #[serde(default)]
    pub reply_video_info: Option<String>,
}

/// One page of reviews for a store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewPage {
    pub total: u64,
    pub offset: i64,
    pub limit: i64,
    pub list: Vec<ReviewView>,
}
