/// 服务配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATABASE_PATH | review.db | SQLite 数据库文件 |
/// | HTTP_PORT | 8000 | HTTP 服务端口 |
/// | ES_URL | (unset) | Elasticsearch 地址；未设置时使用内存索引 |
/// | ES_INDEX | review | 索引名 |
/// | CACHE_NAMESPACE | review | 缓存 key 前缀 |
/// | CACHE_CAPACITY | 10000 | 缓存条目上限 |
/// | SNOWFLAKE_EPOCH | 2024-01-01 | ID 生成器纪元 (YYYY-MM-DD) |
/// | SNOWFLAKE_NODE_ID | 1 | ID 生成器节点号 (1-1023) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志输出 |
/// | LOG_DIR | (unset) | 日志目录，按天滚动 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// DATABASE_PATH=/data/review.db ES_URL=http://localhost:9200 cargo run -p review-service
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 数据库文件路径
    pub database_path: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// Elasticsearch base URL
    pub es_url: Option<String>,
    pub es_index: String,
    /// Prefix of every cache key
    pub cache_namespace: String,
    pub cache_capacity: u64,
    /// ID generator epoch, `YYYY-MM-DD`
    pub snowflake_epoch: String,
    pub snowflake_node_id: i64,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "review.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            es_url: std::env::var("ES_URL").ok().filter(|s| !s.is_empty()),
            es_index: std::env::var("ES_INDEX").unwrap_or_else(|_| "review".into()),
            cache_namespace: std::env::var("CACHE_NAMESPACE").unwrap_or_else(|_| "review".into()),
            cache_capacity: std::env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(crate::cache::DEFAULT_CACHE_CAPACITY),
            snowflake_epoch: std::env::var("SNOWFLAKE_EPOCH")
                .unwrap_or_else(|_| "2024-01-01".into()),
            snowflake_node_id: std::env::var("SNOWFLAKE_NODE_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
