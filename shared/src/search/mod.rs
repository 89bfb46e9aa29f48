//! Search index client
//!
//! Documents are JSON objects keyed by a string id. The review document id is
//! the decimal `review_id`.
//!
//! - [`ElasticsearchIndex`]: REST client over `reqwest`
//! - [`MemoryIndex`]: in-process index with the same semantics, for tests and
//!   local runs

mod elasticsearch;
mod memory;

pub use elasticsearch::ElasticsearchIndex;
pub use memory::MemoryIndex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A JSON document body
pub type Document = Map<String, Value>;

/// Index operation failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IndexError {
    /// Network failure or timeout talking to the index
    #[error("index transport error: {0}")]
    Transport(String),

    /// The index answered with a non-success status
    #[error("index returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The index answered with a body we could not decode
    #[error("index response decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for IndexError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            IndexError::Decode(err.to_string())
        } else {
            IndexError::Transport(err.to_string())
        }
    }
}

/// One search hit: document id plus raw source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub id: String,
    pub source: Value,
}

/// Raw page of search hits
///
/// Kept undecoded so the same bytes can be cached and decoded by each reader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HitsPage {
    /// Total matching documents, not just this page
    pub total: u64,
    pub hits: Vec<Hit>,
}

/// Document index used by the indexer (writes) and the query engine (reads)
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Create or fully overwrite the document `id`
    async fn upsert(&self, id: &str, doc: &Document) -> Result<(), IndexError>;

    /// Merge `fields` into the document `id`, creating it when absent
    async fn merge(&self, id: &str, fields: &Document) -> Result<(), IndexError>;

    /// Fetch the document `id`
    async fn get(&self, id: &str) -> Result<Option<Document>, IndexError>;

    /// Page through documents whose `field` equals `value` exactly
    async fn search_by_term(
        &self,
        field: &str,
        value: &str,
        offset: i64,
        limit: i64,
    ) -> Result<HitsPage, IndexError>;
}

/// String form of a scalar JSON value, as used for term matching
pub(crate) fn term_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
