//! 变更流消费 Worker
//!
//! 逐条读取消息、解码为变更事件、写入索引后提交位点。消息处理是串行的，
//! 索引写入慢时读取也随之变慢。
//!
//! Exit conditions:
//! - cancellation: returns `Ok` with the stats so far
//! - end of stream: returns `Ok`
//! - read or commit failure: returns the error
//!
//! The source is closed on every exit path.

use shared::message::ChangeEnvelope;
use tokio_util::sync::CancellationToken;

use crate::error::JobResult;
use crate::indexer::DocumentIndexer;
use crate::source::{EventSource, SourceMessage};

/// Counters reported when the worker stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Messages read from the source
    pub messages: u64,
    /// Messages dropped because the envelope did not decode
    pub malformed: u64,
    pub rows_indexed: u64,
    pub rows_skipped: u64,
}

/// 索引 Worker
///
/// 从事件源消费变更消息，交给 [`DocumentIndexer`] 写入索引。
pub struct IndexWorker<S: EventSource> {
    source: S,
    indexer: DocumentIndexer,
}

impl<S: EventSource> IndexWorker<S> {
    pub fn new(source: S, indexer: DocumentIndexer) -> Self {
        Self { source, indexer }
    }

    /// 运行 worker（阻塞直到取消、流结束或读取失败）
    pub async fn run(mut self, cancel: CancellationToken) -> JobResult<WorkerStats> {
        tracing::info!("📥 Index worker started");

        let mut stats = WorkerStats::default();
        let result = self.consume(&cancel, &mut stats).await;

        if let Err(e) = self.source.close().await {
            tracing::warn!(error = %e, "Failed to close event source");
        }

        match &result {
            Ok(()) => tracing::info!(
                messages = stats.messages,
                malformed = stats.malformed,
                rows_indexed = stats.rows_indexed,
                rows_skipped = stats.rows_skipped,
                "Index worker stopped"
            ),
            Err(e) => tracing::error!(error = %e, messages = stats.messages, "Index worker aborted"),
        }
        result.map(|()| stats)
    }

    async fn consume(&mut self, cancel: &CancellationToken, stats: &mut WorkerStats) -> JobResult<()> {
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("Cancellation requested, stopping consumer");
                    return Ok(());
                }
                next = self.source.next_message() => next?,
            };

            let Some(msg) = next else {
                tracing::info!("Event source exhausted");
                return Ok(());
            };
            stats.messages += 1;

            handle(&self.indexer, &msg, stats).await;
            self.source.commit(&msg).await?;
        }
    }
}

/// Decode one message and index its rows; undecodable messages are counted and dropped
async fn handle(indexer: &DocumentIndexer, msg: &SourceMessage, stats: &mut WorkerStats) {
    let envelope = match ChangeEnvelope::from_slice(&msg.payload) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(
                topic = %msg.topic,
                partition = msg.partition,
                offset = msg.offset,
                error = %e,
                "Skipping undecodable message"
            );
            stats.malformed += 1;
            return;
        }
    };

    tracing::debug!(
        offset = msg.offset,
        table = %envelope.table,
        op = %envelope.operation,
        rows = envelope.data.len(),
        "Change event received"
    );

    let outcome = indexer.apply(&envelope).await;
    stats.rows_indexed += outcome.indexed as u64;
    stats.rows_skipped += outcome.skipped as u64;
}
