//! Elasticsearch REST client (no SDK dependency)

use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;

use super::{Document, Hit, HitsPage, IndexError, SearchIndex};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Elasticsearch-backed [`SearchIndex`] bound to one index name
#[derive(Debug, Clone)]
pub struct ElasticsearchIndex {
    client: reqwest::Client,
    base_url: String,
    index: String,
}

impl ElasticsearchIndex {
    pub fn new(base_url: &str, index: &str) -> Result<Self, IndexError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(client, base_url, index))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str, index: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            index: index.to_string(),
        }
    }

    pub fn index_name(&self) -> &str {
        &self.index
    }

    fn url(&self, tail: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.index, tail)
    }

    /// Turn a non-success response into `IndexError::Status`
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, IndexError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Err(IndexError::Status { status, body })
    }
}

#[async_trait]
impl SearchIndex for ElasticsearchIndex {
    async fn upsert(&self, id: &str, doc: &Document) -> Result<(), IndexError> {
        let resp = self
            .client
            .put(self.url(&format!("_doc/{id}")))
            .json(doc)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn merge(&self, id: &str, fields: &Document) -> Result<(), IndexError> {
        let body = json!({ "doc": fields, "doc_as_upsert": true });
        let resp = self
            .client
            .post(self.url(&format!("_update/{id}")))
            .json(&body)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Document>, IndexError> {
        let resp = self
            .client
            .get(self.url(&format!("_doc/{id}")))
            .send()
            .await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: Value = Self::check(resp).await?.json().await?;
        match body.get("_source") {
            Some(Value::Object(source)) => Ok(Some(source.clone())),
            _ => Err(IndexError::Decode(format!("document {id} has no _source"))),
        }
    }

    async fn search_by_term(
        &self,
        field: &str,
        value: &str,
        offset: i64,
        limit: i64,
    ) -> Result<HitsPage, IndexError> {
        let query = json!({
            "from": offset,
            "size": limit,
            "query": {
                "bool": {
                    "filter": [ { "term": { field: { "value": value } } } ]
                }
            }
        });
        let resp = self
            .client
            .post(self.url("_search"))
            .json(&query)
            .send()
            .await?;
        let body: Value = Self::check(resp).await?.json().await?;
        parse_search_response(&body)
    }
}

/// Extract total and hits from a `_search` response body
fn parse_search_response(body: &Value) -> Result<HitsPage, IndexError> {
    let hits = body
        .get("hits")
        .ok_or_else(|| IndexError::Decode("search response has no hits".into()))?;

    // `total` is an object since 7.x, a bare number before that
    let total = match hits.get("total") {
        Some(Value::Object(t)) => t.get("value").and_then(Value::as_u64).unwrap_or(0),
        Some(v) => v.as_u64().unwrap_or(0),
        None => 0,
    };

    let list = hits
        .get("hits")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .map(|h| Hit {
                    id: h
                        .get("_id")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    source: h.get("_source").cloned().unwrap_or(Value::Null),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(HitsPage { total, hits: list })
}
