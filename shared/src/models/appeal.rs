//! Review Appeal Model

use serde::{Deserialize, Serialize};

/// Appeal status as stored in `review_appeal_info.status`
///
/// `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum AppealStatus {
    Pending,
    Approved,
    Rejected,
}

impl AppealStatus {
    pub fn from_db(v: i32) -> Option<Self> {
        match v {
            10 => Some(Self::Pending),
            20 => Some(Self::Approved),
            30 => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn as_db(&self) -> i32 {
        match self {
            Self::Pending => 10,
            Self::Approved => 20,
            Self::Rejected => 30,
        }
    }

    /// Any stored value above pending counts as resolved, including codes
    /// this build does not know about.
    pub fn is_resolved_value(v: i32) -> bool {
        v > Self::Pending.as_db()
    }
}

impl From<AppealStatus> for i32 {
    fn from(s: AppealStatus) -> Self {
        s.as_db()
    }
}

impl TryFrom<i32> for AppealStatus {
    type Error = String;

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        Self::from_db(v).ok_or_else(|| format!("unknown appeal status {v}"))
    }
}

/// Store appeal against a review (`review_appeal_info` row)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ReviewAppeal {
    pub appeal_id: i64,
    pub review_id: i64,
    pub store_id: i64,
    pub status: i32,
    pub reason: String,
    pub content: String,
    pub pic_info: String,
    pub video_info: String,
    pub op_user: String,
    pub op_reason: String,
    pub op_remarks: String,
    pub version: i32,
    pub create_at: String,
    pub update_at: String,
}

impl ReviewAppeal {
    pub fn is_resolved(&self) -> bool {
        AppealStatus::is_resolved_value(self.status)
    }
}

/// Create (or amend, while pending) appeal payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppealCreate {
    pub review_id: i64,
    pub store_id: i64,
    pub reason: String,
    pub content: String,
    #[serde(default)]
    pub pic_info: String,
    #[serde(default)]
    pub video_info: String,
}

/// Operator decision on an appeal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppealAudit {
    pub appeal_id: i64,
    pub status: AppealStatus,
    pub op_user: String,
    #[serde(default)]
    pub op_reason: String,
    #[serde(default)]
    pub op_remarks: String,
}
