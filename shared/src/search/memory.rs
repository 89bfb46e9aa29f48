//! In-process search index

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{Document, Hit, HitsPage, IndexError, SearchIndex, term_string};

/// [`SearchIndex`] held in memory
///
/// Term search returns matches newest first (numeric id descending), which is
/// the order snowflake ids give for creation time.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    docs: RwLock<HashMap<String, Document>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

fn id_order(a: &str, b: &str) -> std::cmp::Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => y.cmp(&x),
        _ => b.cmp(a),
    }
}

#[async_trait]
impl SearchIndex for MemoryIndex {
    async fn upsert(&self, id: &str, doc: &Document) -> Result<(), IndexError> {
        self.docs.write().await.insert(id.to_string(), doc.clone());
        Ok(())
    }

    async fn merge(&self, id: &str, fields: &Document) -> Result<(), IndexError> {
        let mut docs = self.docs.write().await;
        let doc = docs.entry(id.to_string()).or_default();
        for (k, v) in fields {
            doc.insert(k.clone(), v.clone());
        }
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Document>, IndexError> {
        Ok(self.docs.read().await.get(id).cloned())
    }

    async fn search_by_term(
        &self,
        field: &str,
        value: &str,
        offset: i64,
        limit: i64,
    ) -> Result<HitsPage, IndexError> {
        let docs = self.docs.read().await;
        let mut matched: Vec<(&String, &Document)> = docs
            .iter()
            .filter(|(_, doc)| {
                doc.get(field)
                    .and_then(term_string)
                    .is_some_and(|v| v == value)
            })
            .collect();
        matched.sort_by(|a, b| id_order(a.0, b.0));

        let total = matched.len() as u64;
        let hits = matched
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|(id, doc)| Hit {
                id: id.clone(),
                source: serde_json::Value::Object(doc.clone()),
            })
            .collect();

        Ok(HitsPage { total, hits })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: serde_json::Value) -> Document {
        match v {
            serde_json::Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[tokio::test]
    async fn test_upsert_overwrites() {
        let idx = MemoryIndex::new();
        idx.upsert("1", &doc(json!({"store_id": "7", "content": "a"})))
            .await
            .unwrap();
        idx.upsert("1", &doc(json!({"store_id": "7"}))).await.unwrap();

        let stored = idx.get("1").await.unwrap().unwrap();
        assert!(stored.get("content").is_none());
        assert_eq!(idx.len().await, 1);
    }

    #[tokio::test]
    async fn test_merge_keeps_other_fields_and_creates_missing() {
        let idx = MemoryIndex::new();
        idx.merge("5", &doc(json!({"reply_id": "9"}))).await.unwrap();
        idx.merge("5", &doc(json!({"store_id": "7"}))).await.unwrap();

        let stored = idx.get("5").await.unwrap().unwrap();
        assert_eq!(stored["reply_id"], "9");
        assert_eq!(stored["store_id"], "7");
    }

    #[tokio::test]
    async fn test_term_search_pages_newest_first() {
        let idx = MemoryIndex::new();
        for id in 1..=12 {
            let store = if id % 2 == 0 { "7" } else { "8" };
            idx.upsert(&id.to_string(), &doc(json!({"store_id": store})))
                .await
                .unwrap();
        }
        // numbers and strings match alike
        idx.upsert("100", &doc(json!({"store_id": 7}))).await.unwrap();

        let page = idx.search_by_term("store_id", "7", 0, 3).await.unwrap();
        assert_eq!(page.total, 7);
        let ids: Vec<_> = page.hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["100", "12", "10"]);

        let page = idx.search_by_term("store_id", "7", 6, 3).await.unwrap();
        assert_eq!(page.hits.len(), 1);
        assert_eq!(page.hits[0].id, "2");

        let page = idx.search_by_term("store_id", "9", 0, 10).await.unwrap();
        assert_eq!(page.total, 0);
    }
}
