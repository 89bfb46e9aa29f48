//! Shared fixtures for review-service integration tests

#![allow(dead_code)]

use std::sync::Arc;

use review_service::ServerState;
use review_service::cache::{CacheStore, MokaCache};
use review_service::db::DbService;
use shared::IdGenerator;
use shared::models::ReviewCreate;
use shared::search::{MemoryIndex, SearchIndex};
use tempfile::TempDir;

pub struct TestEnv {
    /// Keeps the database directory alive for the test
    pub _dir: TempDir,
    pub state: ServerState,
    pub index: Arc<MemoryIndex>,
}

pub async fn setup() -> TestEnv {
    setup_with(Arc::new(MokaCache::default())).await
}

pub async fn setup_with(cache: Arc<dyn CacheStore>) -> TestEnv {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("review.db");
    let db = DbService::new(path.to_str().unwrap()).await.unwrap();

    let ids = Arc::new(IdGenerator::new("2024-01-01", 1).unwrap());
    let index = Arc::new(MemoryIndex::new());
    let state = ServerState::from_parts(
        db.pool,
        ids,
        index.clone() as Arc<dyn SearchIndex>,
        cache,
        "review",
    );

    TestEnv {
        _dir: dir,
        state,
        index,
    }
}

pub fn new_review(order_id: i64, user_id: i64, store_id: i64) -> ReviewCreate {
    ReviewCreate {
        order_id,
        user_id,
        store_id,
        score: 5,
        content: "great food".into(),
        ..Default::default()
    }
}
