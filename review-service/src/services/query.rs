//! Cache-aside query engine for "reviews of a store"
//!
//! Read path: cache → (miss) → coalesced index query → cache fill → caller.
//! The index holds the projection maintained by review-job; this path never
//! writes to it.

use std::sync::Arc;

use shared::models::{ReviewPage, ReviewView};
use shared::search::{Hit, HitsPage, SearchIndex};
use shared::util::page_window;

use crate::cache::{CacheStore, Coalescer, PAGE_TTL};
use crate::error::{ServiceError, ServiceResult};

/// Index field the store filter applies to
const STORE_FIELD: &str = "store_id";

/// Serves paginated store listings from the search index through the cache
#[derive(Clone)]
pub struct ReviewQueryEngine {
    index: Arc<dyn SearchIndex>,
    cache: Arc<dyn CacheStore>,
    inflight: Arc<Coalescer<Arc<HitsPage>, ServiceError>>,
    namespace: String,
}

impl ReviewQueryEngine {
    pub fn new(
        index: Arc<dyn SearchIndex>,
        cache: Arc<dyn CacheStore>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            index,
            cache,
            inflight: Arc::new(Coalescer::new()),
            namespace: namespace.into(),
        }
    }

    /// Cache key for one page: `<namespace>:<store_id>:<offset>:<limit>`
    pub fn cache_key(&self, store_id: i64, offset: i64, limit: i64) -> String {
        format!("{}:{store_id}:{offset}:{limit}", self.namespace)
    }

    /// One page of a store's reviews
    ///
    /// Documents that fail to decode are skipped, so a page may hold fewer
    /// entries than `limit`.
    pub async fn list_review_by_store(
        &self,
        store_id: i64,
        page: i64,
        size: i64,
    ) -> ServiceResult<ReviewPage> {
        let (offset, limit) = page_window(page, size);
        let key = self.cache_key(store_id, offset, limit);
        tracing::debug!(store_id, offset, limit, key = %key, "list_review_by_store");

        let hits = match self.lookup(&key).await {
            Some(hits) => hits,
            None => self.fetch_coalesced(key, store_id, offset, limit).await?,
        };

        let list = decode_views(&hits);
        Ok(ReviewPage {
            total: hits.total,
            offset,
            limit,
            list,
        })
    }

    /// Read the cache. Every failure counts as a miss.
    async fn lookup(&self, key: &str) -> Option<Arc<HitsPage>> {
        match self.cache.get(key).await {
            Ok(Some(bytes)) => match decode_page(&bytes) {
                Ok(hits) => {
                    tracing::debug!(key = %key, "Cache hit");
                    Some(Arc::new(hits))
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Discarding cache entry");
                    None
                }
            },
            Ok(None) => {
                tracing::debug!(key = %key, "Cache miss");
                None
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache unavailable, querying index");
                None
            }
        }
    }

    /// Query the index once per key no matter how many callers miss together
    async fn fetch_coalesced(
        &self,
        key: String,
        store_id: i64,
        offset: i64,
        limit: i64,
    ) -> ServiceResult<Arc<HitsPage>> {
        let index = self.index.clone();
        let cache = self.cache.clone();
        let fill_key = key.clone();

        self.inflight
            .run(&key, move || async move {
                let hits = index
                    .search_by_term(STORE_FIELD, &store_id.to_string(), offset, limit)
                    .await
                    .map_err(|e| {
                        tracing::error!(store_id, error = %e, "Index query failed");
                        ServiceError::from(e)
                    })?;

                match serde_json::to_vec(&hits) {
                    Ok(bytes) => {
                        if let Err(e) = cache.set(&fill_key, bytes, PAGE_TTL).await {
                            tracing::warn!(key = %fill_key, error = %e, "Cache fill failed");
                        }
                    }
                    Err(e) => {
                        tracing::warn!(key = %fill_key, error = %e, "Failed to serialize page for cache");
                    }
                }

                Ok(Arc::new(hits))
            })
            .await
    }
}

fn decode_page(bytes: &[u8]) -> ServiceResult<HitsPage> {
    serde_json::from_slice(bytes).map_err(|e| ServiceError::Decode(format!("cached page: {e}")))
}

fn decode_view(hit: &Hit) -> ServiceResult<ReviewView> {
    serde_json::from_value(hit.source.clone())
        .map_err(|e| ServiceError::Decode(format!("review document {}: {e}", hit.id)))
}

/// Decode hits into view records, logging and skipping bad documents
fn decode_views(hits: &HitsPage) -> Vec<ReviewView> {
    hits.hits
        .iter()
        .filter_map(|hit| match decode_view(hit) {
            Ok(view) => Some(view),
            Err(e) => {
                tracing::warn!(doc_id = %hit.id, error = %e, "Skipping review document");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_views_skips_bad_documents() {
        let hits = HitsPage {
            total: 3,
            hits: vec![
                Hit {
                    id: "1".into(),
                    source: json!({"review_id":"1","store_id":"7","create_at":"2024-07-19 10:41:52"}),
                },
                Hit {
                    id: "2".into(),
                    source: json!({"review_id":"2","store_id":"7","create_at":"2024-07-19T10:41:52"}),
                },
                Hit {
                    id: "3".into(),
                    source: json!({"review_id":"3","store_id":"7","create_at":"2024-07-20 08:00:00"}),
                },
            ],
        };
        let views = decode_views(&hits);
        let ids: Vec<i64> = views.iter().map(|v| v.review_id).collect();
        assert_eq!(ids, vec![1, 3]);

        assert!(matches!(decode_view(&hits.hits[1]), Err(ServiceError::Decode(_))));
    }

    #[test]
    fn test_corrupt_cached_page_is_a_decode_error() {
        assert!(matches!(decode_page(b"{truncated"), Err(ServiceError::Decode(_))));
        let page = decode_page(br#"{"total":0,"hits":[]}"#).unwrap();
        assert_eq!(page.total, 0);
    }
}
