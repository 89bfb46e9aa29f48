use std::path::PathBuf;

/// Job 配置
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | ES_URL | (unset) | Elasticsearch 地址；未设置时写入内存索引 (dry run) |
/// | ES_INDEX | review | 索引名 |
/// | SOURCE_PATH | (unset) | JSON-lines 消息文件；未设置时读 stdin |
/// | SOURCE_TOPIC | review | 消费的 topic |
/// | KAFKA_BROKERS | (unset) | Kafka 地址列表；设置后从 broker 消费 (需 `kafka` feature) |
/// | KAFKA_GROUP_ID | review-job | 消费组 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志输出 |
/// | LOG_DIR | (unset) | 日志目录，按天滚动 |
#[derive(Debug, Clone)]
pub struct Config {
    pub es_url: Option<String>,
    pub es_index: String,
    pub source_path: Option<PathBuf>,
    pub source_topic: String,
    pub kafka_brokers: Option<String>,
    pub kafka_group_id: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self {
            es_url: std::env::var("ES_URL").ok().filter(|s| !s.is_empty()),
            es_index: std::env::var("ES_INDEX").unwrap_or_else(|_| "review".into()),
            source_path: std::env::var("SOURCE_PATH")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            source_topic: std::env::var("SOURCE_TOPIC").unwrap_or_else(|_| "review".into()),
            kafka_brokers: std::env::var("KAFKA_BROKERS").ok().filter(|s| !s.is_empty()),
            kafka_group_id: std::env::var("KAFKA_GROUP_ID").unwrap_or_else(|_| "review-job".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
