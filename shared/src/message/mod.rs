//! 变更事件消息定义
//!
//! The change stream publishes one JSON envelope per committed statement:
//!
//! ```json
//! {"type":"INSERT","database":"review","table":"review_info","isDdl":false,
//!  "data":[{"review_id":"1815950427236438016","store_id":"7", ...}]}
//! ```
//!
//! Every column value is transmitted as a string. Envelopes are shared between
//! the job that consumes them and the tests/tools that produce them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Row operation carried by an envelope
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeOperation {
    Insert,
    Update,
    Delete,
    /// DDL statements and anything this build does not recognise
    Other(String),
}

impl ChangeOperation {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ChangeOperation {
    fn from(s: String) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "INSERT" => Self::Insert,
            "UPDATE" => Self::Update,
            "DELETE" => Self::Delete,
            _ => Self::Other(s),
        }
    }
}

impl From<ChangeOperation> for String {
    fn from(op: ChangeOperation) -> Self {
        op.as_str().to_string()
    }
}

impl Serialize for ChangeOperation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ChangeOperation {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

impl fmt::Display for ChangeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row-level decode failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("row is missing field `{0}`")]
    MissingField(String),

    #[error("field `{field}` is not a valid id: {value}")]
    InvalidId { field: String, value: String },
}

/// One changed row: column name to value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeRow(pub Map<String, Value>);

impl ChangeRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and producers
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Column value as a string, whether transmitted as string or number
    pub fn get_str(&self, field: &str) -> Option<String> {
        match self.0.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Primary identifier of the row in its canonical string form
    ///
    /// Fails when the field is absent, empty or not an integer.
    pub fn required_id(&self, field: &str) -> Result<String, RowError> {
        let raw = self
            .get_str(field)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| RowError::MissingField(field.to_string()))?;
        raw.trim()
            .parse::<i64>()
            .map(|id| id.to_string())
            .map_err(|_| RowError::InvalidId {
                field: field.to_string(),
                value: raw,
            })
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

/// Change event envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEnvelope {
    #[serde(rename = "type")]
    pub operation: ChangeOperation,
    #[serde(default)]
    pub database: String,
    pub table: String,
    #[serde(rename = "isDdl", default)]
    pub is_ddl: bool,
    /// `null` for DDL statements
    #[serde(default, deserialize_with = "rows_or_null")]
    pub data: Vec<ChangeRow>,
}

fn rows_or_null<'de, D>(deserializer: D) -> Result<Vec<ChangeRow>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<ChangeRow>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ChangeEnvelope {
    pub fn new(operation: ChangeOperation, table: impl Into<String>) -> Self {
        Self {
            operation,
            database: String::new(),
            table: table.into(),
            is_ddl: false,
            data: Vec::new(),
        }
    }

    pub fn with_row(mut self, row: ChangeRow) -> Self {
        self.data.push(row);
        self
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
