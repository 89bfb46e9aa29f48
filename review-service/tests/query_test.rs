//! Store listing: cache-aside, coalescing and lenient decoding

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use review_service::ReviewQueryEngine;
use review_service::cache::{CacheError, CacheStore, MokaCache};
use review_service::error::ServiceError;
use serde_json::json;
use shared::search::{Document, HitsPage, IndexError, MemoryIndex, SearchIndex};

/// Index wrapper that counts term searches and makes them slow
struct CountingIndex {
    inner: MemoryIndex,
    searches: AtomicUsize,
    delay: Duration,
    fail: bool,
}

impl CountingIndex {
    fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryIndex::new(),
            searches: AtomicUsize::new(0),
            delay,
            fail: false,
        }
    }

    fn failing(delay: Duration) -> Self {
        Self {
            fail: true,
            ..Self::new(delay)
        }
    }

    fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchIndex for CountingIndex {
    async fn upsert(&self, id: &str, doc: &Document) -> Result<(), IndexError> {
        self.inner.upsert(id, doc).await
    }

    async fn merge(&self, id: &str, fields: &Document) -> Result<(), IndexError> {
        self.inner.merge(id, fields).await
    }

    async fn get(&self, id: &str) -> Result<Option<Document>, IndexError> {
        self.inner.get(id).await
    }

    async fn search_by_term(
        &self,
        field: &str,
        value: &str,
        offset: i64,
        limit: i64,
    ) -> Result<HitsPage, IndexError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if self.fail {
            return Err(IndexError::Transport("connection refused".into()));
        }
        self.inner.search_by_term(field, value, offset, limit).await
    }
}

/// Cache whose backend is always down
struct DownCache;

#[async_trait]
impl CacheStore for DownCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Err(CacheError::Unavailable("connection reset".into()))
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection reset".into()))
    }
}

fn doc(v: serde_json::Value) -> Document {
    v.as_object().cloned().unwrap()
}

async fn seed(index: &dyn SearchIndex, store_id: i64, count: i64) {
    for i in 1..=count {
        let id = store_id * 1000 + i;
        index
            .upsert(
                &id.to_string(),
                &doc(json!({
                    "review_id": id.to_string(),
                    "store_id": store_id.to_string(),
                    "score": "5",
                    "content": format!("review {i}"),
                    "create_at": "2024-07-19 10:41:52",
                })),
            )
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_concurrent_misses_issue_one_index_query() {
    let index = Arc::new(CountingIndex::new(Duration::from_millis(100)));
    seed(index.as_ref(), 7, 3).await;
    let engine = ReviewQueryEngine::new(index.clone(), Arc::new(MokaCache::default()), "review");

    let mut handles = Vec::new();
    for _ in 0..20 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.list_review_by_store(7, 1, 10).await
        }));
    }
    for h in handles {
        let page = h.await.unwrap().unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.list.len(), 3);
    }
    assert_eq!(index.searches(), 1);

    // The next call is a cache hit
    engine.list_review_by_store(7, 1, 10).await.unwrap();
    assert_eq!(index.searches(), 1);

    // A different window is a different key
    engine.list_review_by_store(7, 2, 10).await.unwrap();
    assert_eq!(index.searches(), 2);
}

#[tokio::test]
async fn test_page_window_normalization_and_cache_key() {
    let index = Arc::new(CountingIndex::new(Duration::ZERO));
    seed(index.as_ref(), 9, 12).await;
    let cache = Arc::new(MokaCache::default());
    let engine = ReviewQueryEngine::new(index.clone(), cache.clone(), "review");

    let page = engine.list_review_by_store(9, 0, 999).await.unwrap();
    assert_eq!(page.offset, 0);
    assert_eq!(page.limit, 10);
    assert_eq!(page.list.len(), 10);
    assert_eq!(page.total, 12);

    assert_eq!(engine.cache_key(9, 0, 10), "review:9:0:10");
    assert!(cache.get("review:9:0:10").await.unwrap().is_some());
}

#[tokio::test]
async fn test_cache_outage_falls_through_to_index() {
    let index = Arc::new(CountingIndex::new(Duration::ZERO));
    seed(index.as_ref(), 7, 2).await;
    let engine = ReviewQueryEngine::new(index.clone(), Arc::new(DownCache), "review");

    for _ in 0..2 {
        let page = engine.list_review_by_store(7, 1, 10).await.unwrap();
        assert_eq!(page.list.len(), 2);
    }
    assert_eq!(index.searches(), 2);
}

#[tokio::test]
async fn test_index_failure_reaches_every_waiter_once() {
    let index = Arc::new(CountingIndex::failing(Duration::from_millis(100)));
    let engine = ReviewQueryEngine::new(index.clone(), Arc::new(MokaCache::default()), "review");

    let mut handles = Vec::new();
    for _ in 0..5 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.list_review_by_store(7, 1, 10).await
        }));
    }
    for h in handles {
        assert!(matches!(
            h.await.unwrap(),
            Err(ServiceError::UpstreamUnavailable(_))
        ));
    }
    assert_eq!(index.searches(), 1);
}

#[tokio::test]
async fn test_undecodable_documents_are_skipped() {
    let index = Arc::new(MemoryIndex::new());
    seed(index.as_ref(), 7, 2).await;
    index
        .upsert(
            "7999",
            &doc(json!({"review_id": "7999", "store_id": "7", "score": "five",
                        "create_at": "2024-07-19 10:41:52"})),
        )
        .await
        .unwrap();
    let engine = ReviewQueryEngine::new(index, Arc::new(MokaCache::default()), "review");

    let page = engine.list_review_by_store(7, 1, 10).await.unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.list.len(), 2);
    assert!(page.list.iter().all(|v| v.review_id != 7999));
}

#[tokio::test]
async fn test_corrupt_cache_entry_is_refetched() {
    let index = Arc::new(CountingIndex::new(Duration::ZERO));
    seed(index.as_ref(), 7, 1).await;
    let cache = Arc::new(MokaCache::default());
    cache
        .set("review:7:0:10", b"not json".to_vec(), Duration::from_secs(60))
        .await
        .unwrap();
    let engine = ReviewQueryEngine::new(index.clone(), cache, "review");

    let page = engine.list_review_by_store(7, 1, 10).await.unwrap();
    assert_eq!(page.list.len(), 1);
    assert_eq!(index.searches(), 1);
}

#[tokio::test]
async fn test_listing_through_server_state() {
    let env = common::setup().await;
    seed(env.index.as_ref(), 5, 4).await;

    let page = env
        .state
        .queries
        .list_review_by_store(5, 1, 3)
        .await
        .unwrap();
    assert_eq!(page.total, 4);
    assert_eq!(page.list.len(), 3);
    assert_eq!(page.list[0].review_id, 5004);
}
