use std::sync::Arc;

use shared::IdGenerator;
use shared::error::{AppError, ErrorCode};
use shared::search::{ElasticsearchIndex, MemoryIndex, SearchIndex};
use sqlx::SqlitePool;

use crate::cache::{CacheStore, MokaCache};
use crate::core::Config;
use crate::db::DbService;
use crate::services::{ReviewQueryEngine, ReviewService};

/// 服务共享状态
///
/// Cloned into every request handler; all fields are cheap handles.
#[derive(Clone)]
pub struct ServerState {
    pub pool: SqlitePool,
    pub reviews: ReviewService,
    pub queries: ReviewQueryEngine,
}

impl ServerState {
    /// 根据配置初始化：ID 生成器、数据库、索引客户端、缓存
    ///
    /// A bad ID-generator configuration is fatal here, before anything listens.
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let ids = IdGenerator::new(&config.snowflake_epoch, config.snowflake_node_id)
            .map_err(|e| AppError::with_message(ErrorCode::ConfigError, e.to_string()))?;

        let db = DbService::new(&config.database_path).await?;

        let index: Arc<dyn SearchIndex> = match &config.es_url {
            Some(url) => {
                tracing::info!(url = %url, index = %config.es_index, "Using Elasticsearch index");
                Arc::new(
                    ElasticsearchIndex::new(url, &config.es_index)
                        .map_err(|e| AppError::with_message(ErrorCode::ConfigError, e.to_string()))?,
                )
            }
            None => {
                tracing::warn!("ES_URL not set, using in-memory index");
                Arc::new(MemoryIndex::new())
            }
        };

        let cache: Arc<dyn CacheStore> = Arc::new(MokaCache::new(config.cache_capacity));

        Ok(Self::from_parts(
            db.pool,
            Arc::new(ids),
            index,
            cache,
            &config.cache_namespace,
        ))
    }

    /// Assemble state from already-built collaborators
    pub fn from_parts(
        pool: SqlitePool,
        ids: Arc<IdGenerator>,
        index: Arc<dyn SearchIndex>,
        cache: Arc<dyn CacheStore>,
        cache_namespace: &str,
    ) -> Self {
        Self {
            reviews: ReviewService::new(pool.clone(), ids),
            queries: ReviewQueryEngine::new(index, cache, cache_namespace),
            pool,
        }
    }
}
