use std::sync::Arc;

use review_job::{
    Config, DocumentIndexer, EventSource, IndexWorker, JobError, JobResult, JsonlSource,
    WorkerStats,
};
use shared::search::{ElasticsearchIndex, MemoryIndex, SearchIndex};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    review_job::init_logger_with_file(
        Some(&config.log_level),
        Some(config.log_json),
        config.log_dir.as_deref(),
    )?;

    tracing::info!(topic = %config.source_topic, index = %config.es_index, "🚀 Review job starting");

    let index: Arc<dyn SearchIndex> = match &config.es_url {
        Some(url) => Arc::new(
            ElasticsearchIndex::new(url, &config.es_index)
                .map_err(|e| JobError::Config(format!("search index client: {e}")))?,
        ),
        None => {
            tracing::warn!("ES_URL not set, indexing into an in-memory index (dry run)");
            Arc::new(MemoryIndex::new())
        }
    };

    let cancel = CancellationToken::new();
    let signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                signal.cancel();
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
        }
    });

    let indexer = DocumentIndexer::new(index);
    let stats = match &config.kafka_brokers {
        Some(brokers) => consume_kafka(&config, brokers, indexer, cancel).await?,
        None => {
            let source = match &config.source_path {
                Some(path) => JsonlSource::open(path, config.source_topic.clone()).await?,
                None => JsonlSource::stdin(config.source_topic.clone()),
            };
            consume(source, indexer, cancel).await?
        }
    };

    tracing::info!(messages = stats.messages, rows = stats.rows_indexed, "Review job finished");
    Ok(())
}

async fn consume<S: EventSource>(
    source: S,
    indexer: DocumentIndexer,
    cancel: CancellationToken,
) -> JobResult<WorkerStats> {
    IndexWorker::new(source, indexer).run(cancel).await
}

#[cfg(feature = "kafka")]
async fn consume_kafka(
    config: &Config,
    brokers: &str,
    indexer: DocumentIndexer,
    cancel: CancellationToken,
) -> JobResult<WorkerStats> {
    let source =
        review_job::source::KafkaSource::subscribe(brokers, &config.kafka_group_id, &config.source_topic)?;
    consume(source, indexer, cancel).await
}

#[cfg(not(feature = "kafka"))]
async fn consume_kafka(
    _config: &Config,
    _brokers: &str,
    _indexer: DocumentIndexer,
    _cancel: CancellationToken,
) -> JobResult<WorkerStats> {
    Err(JobError::Config(
        "KAFKA_BROKERS is set but this build lacks the `kafka` feature".into(),
    ))
}
