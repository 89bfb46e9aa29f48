//! Review Model

use serde::{Deserialize, Serialize};

/// Review lifecycle status as stored in `review_info.status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum ReviewStatus {
    /// Created, waiting for operator audit
    Pending,
    /// Audited and visible
    Approved,
    /// Audited and rejected
    Rejected,
    /// Hidden (appeal approved)
    Hidden,
}

impl ReviewStatus {
    pub fn from_db(v: i32) -> Option<Self> {
        match v {
            10 => Some(Self::Pending),
            20 => Some(Self::Approved),
            30 => Some(Self::Rejected),
            40 => Some(Self::Hidden),
            _ => None,
        }
    }

    pub fn as_db(&self) -> i32 {
        match self {
            Self::Pending => 10,
            Self::Approved => 20,
            Self::Rejected => 30,
            Self::Hidden => 40,
        }
    }
}

impl From<ReviewStatus> for i32 {
    fn from(s: ReviewStatus) -> Self {
        s.as_db()
    }
}

impl TryFrom<i32> for ReviewStatus {
    type Error = String;

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        Self::from_db(v).ok_or_else(|| format!("unknown review status {v}"))
    }
}

/// Review entity (`review_info` row)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Review {
    pub review_id: i64,
    pub order_id: i64,
    pub user_id: i64,
    pub store_id: i64,
    pub sku_id: i64,
    pub spu_id: i64,
    pub score: i32,
    pub service_score: i32,
    pub express_score: i32,
    pub content: String,
    pub pic_info: String,
    pub video_info: String,
    pub tags: String,
    pub anonymous: bool,
    pub has_media: bool,
    pub has_reply: bool,
    pub status: i32,
    pub is_default: bool,
    pub op_user: String,
    pub op_reason: String,
    pub op_remarks: String,
    pub goods_snapshot: String,
    pub ext_json: String,
    pub version: i32,
    pub create_at: String,
    pub update_at: String,
}

impl Review {
    pub fn review_status(&self) -> Option<ReviewStatus> {
        ReviewStatus::from_db(self.status)
    }
}

/// Create review payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewCreate {
    pub order_id: i64,
    pub user_id: i64,
    pub store_id: i64,
    #[serde(default)]
    pub sku_id: i64,
    #[serde(default)]
    pub spu_id: i64,
    pub score: i32,
    #[serde(default)]
    pub service_score: i32,
    #[serde(default)]
    pub express_score: i32,
    pub content: String,
    #[serde(default)]
    pub pic_info: String,
    #[serde(default)]
    pub video_info: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub anonymous: bool,
    #[serde(default)]
    pub goods_snapshot: String,
}

impl ReviewCreate {
    pub fn has_media(&self) -> bool {
        !self.pic_info.is_empty() || !self.video_info.is_empty()
    }
}

/// Operator audit of a review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewAudit {
    pub review_id: i64,
    pub status: ReviewStatus,
    pub op_user: String,
    #[serde(default)]
    pub op_reason: String,
    #[serde(default)]
    pub op_remarks: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip_through_db_value() {
        for status in [
            ReviewStatus::Pending,
            ReviewStatus::Approved,
            ReviewStatus::Rejected,
            ReviewStatus::Hidden,
        ] {
            assert_eq!(ReviewStatus::from_db(status.as_db()), Some(status));
        }
        assert_eq!(ReviewStatus::Hidden.as_db(), 40);
        assert_eq!(ReviewStatus::from_db(0), None);
    }

    #[test]
    fn test_audit_rejects_unknown_status() {
        let json = r#"{"review_id":1,"status":99,"op_user":"ops"}"#;
        assert!(serde_json::from_str::<ReviewAudit>(json).is_err());

        let json = r#"{"review_id":1,"status":30,"op_user":"ops"}"#;
        let audit: ReviewAudit = serde_json::from_str(json).unwrap();
        assert_eq!(audit.status, ReviewStatus::Rejected);
        assert!(audit.op_reason.is_empty());
    }
}
