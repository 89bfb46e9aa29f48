//! 文档索引器
//!
//! Projects change events onto review documents in the search index.
//!
//! | 表 | 操作 | 索引写入 |
//! |----|------|----------|
//! | review_info | INSERT | 以 review_id 为 key 整体覆盖 |
//! | review_info | 其他 | 按 review_id 局部合并 |
//! | review_reply_info | 任意 | 以 reply_ 前缀字段合并到所属评价文档 |
//!
//! Every write is keyed and either overwrites or merges, so replaying the same
//! event leaves the document unchanged. Events for other tables and DDL are
//! ignored.

use std::sync::Arc;

use serde_json::{Map, Value};
use shared::message::{ChangeEnvelope, ChangeOperation, ChangeRow, RowError};
use shared::search::{Document, IndexError, SearchIndex};
use thiserror::Error;

pub const REVIEW_TABLE: &str = "review_info";
pub const REPLY_TABLE: &str = "review_reply_info";

/// Primary key of every review document
const REVIEW_KEY: &str = "review_id";

/// Reply columns copied onto the review document, with their document names
const REPLY_FIELDS: [(&str, &str); 4] = [
    ("reply_id", "reply_id"),
    ("content", "reply_content"),
    ("pic_info", "reply_pic_info"),
    ("video_info", "reply_video_info"),
];

/// Why a single row was not written
#[derive(Debug, Error)]
pub enum RowFailure {
    #[error(transparent)]
    Decode(#[from] RowError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Outcome of applying one envelope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub indexed: usize,
    pub skipped: usize,
}

/// How a row reaches the index
#[derive(Debug, Clone, PartialEq)]
enum IndexWrite {
    Upsert(String, Document),
    Merge(String, Document),
}

pub struct DocumentIndexer {
    index: Arc<dyn SearchIndex>,
}

impl DocumentIndexer {
    pub fn new(index: Arc<dyn SearchIndex>) -> Self {
        Self { index }
    }

    /// Apply every row of an envelope
    ///
    /// A row that cannot be keyed or written is logged and skipped; the rest of
    /// the envelope is still applied.
    pub async fn apply(&self, envelope: &ChangeEnvelope) -> ApplyOutcome {
        let mut outcome = ApplyOutcome::default();

        if envelope.is_ddl {
            tracing::debug!(table = %envelope.table, "Ignoring DDL event");
            return outcome;
        }
        if envelope.table != REVIEW_TABLE && envelope.table != REPLY_TABLE {
            tracing::debug!(table = %envelope.table, op = %envelope.operation, "Ignoring event for unindexed table");
            return outcome;
        }

        for row in &envelope.data {
            match self.apply_row(&envelope.operation, &envelope.table, row).await {
                Ok(doc_id) => {
                    tracing::debug!(doc_id = %doc_id, table = %envelope.table, op = %envelope.operation, "Row indexed");
                    outcome.indexed += 1;
                }
                Err(RowFailure::Decode(e)) => {
                    tracing::warn!(table = %envelope.table, error = %e, "Skipping malformed row");
                    outcome.skipped += 1;
                }
                Err(RowFailure::Index(e)) => {
                    tracing::error!(table = %envelope.table, op = %envelope.operation, error = %e, "Index write failed, row skipped");
                    outcome.skipped += 1;
                }
            }
        }
        outcome
    }

    async fn apply_row(
        &self,
        op: &ChangeOperation,
        table: &str,
        row: &ChangeRow,
    ) -> Result<String, RowFailure> {
        match plan_write(op, table, row)? {
            IndexWrite::Upsert(id, doc) => {
                self.index.upsert(&id, &doc).await?;
                Ok(id)
            }
            IndexWrite::Merge(id, doc) => {
                self.index.merge(&id, &doc).await?;
                Ok(id)
            }
        }
    }
}

fn plan_write(op: &ChangeOperation, table: &str, row: &ChangeRow) -> Result<IndexWrite, RowError> {
    let id = row.required_id(REVIEW_KEY)?;
    if table == REPLY_TABLE {
        let doc = reply_fields(row, &id);
        return Ok(IndexWrite::Merge(id, doc));
    }
    match op {
        ChangeOperation::Insert => Ok(IndexWrite::Upsert(id, row.fields().clone())),
        _ => Ok(IndexWrite::Merge(id, row.fields().clone())),
    }
}

/// Reply columns renamed for the review document; absent columns are left out
fn reply_fields(row: &ChangeRow, review_id: &str) -> Document {
    let mut doc = Map::new();
    for (column, field) in REPLY_FIELDS {
        if let Some(value) = row.get(column) {
            doc.insert(field.to_string(), value.clone());
        }
    }
    doc.insert(REVIEW_KEY.to_string(), Value::from(review_id));
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply_row() -> ChangeRow {
        ChangeRow::new()
            .with("reply_id", "88")
            .with("review_id", "1")
            .with("store_id", "7")
            .with("content", "thanks")
            .with("pic_info", "")
    }

    #[test]
    fn test_review_insert_is_full_upsert() {
        let row = ChangeRow::new().with("review_id", "1").with("score", "5");
        let write = plan_write(&ChangeOperation::Insert, REVIEW_TABLE, &row).unwrap();
        assert_eq!(write, IndexWrite::Upsert("1".into(), row.fields().clone()));
    }

    #[test]
    fn test_review_update_is_merge() {
        let row = ChangeRow::new().with("review_id", 1).with("status", "40");
        let write = plan_write(&ChangeOperation::Update, REVIEW_TABLE, &row).unwrap();
        assert!(matches!(write, IndexWrite::Merge(id, _) if id == "1"));
    }

    #[test]
    fn test_reply_projects_prefixed_fields() {
        let write = plan_write(&ChangeOperation::Insert, REPLY_TABLE, &reply_row()).unwrap();
        let IndexWrite::Merge(id, doc) = write else {
            panic!("reply rows must merge");
        };
        assert_eq!(id, "1");
        assert_eq!(doc.get("reply_id"), Some(&Value::from("88")));
        assert_eq!(doc.get("reply_content"), Some(&Value::from("thanks")));
        assert_eq!(doc.get("reply_pic_info"), Some(&Value::from("")));
        assert!(!doc.contains_key("reply_video_info"));
        assert!(!doc.contains_key("content"));
        assert!(!doc.contains_key("store_id"));
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let row = ChangeRow::new().with("score", "5");
        let err = plan_write(&ChangeOperation::Insert, REVIEW_TABLE, &row).unwrap_err();
        assert_eq!(err, RowError::MissingField("review_id".into()));
    }
}
