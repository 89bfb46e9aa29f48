//! 事件源适配
//!
//! A source yields broker messages one at a time in partition order and
//! accepts commits for the ones that have been handled.
//!
//! - [`ChannelSource`]: in-process `mpsc` source
//! - [`JsonlSource`]: one message per line from a file or stdin
//! - `KafkaSource`: consumer-group reader (`kafka` feature)

mod channel;
mod jsonl;
#[cfg(feature = "kafka")]
mod kafka;

pub use channel::{ChannelSource, CommitLog};
pub use jsonl::JsonlSource;
#[cfg(feature = "kafka")]
pub use kafka::KafkaSource;

use async_trait::async_trait;

use crate::error::JobResult;

/// One message as delivered by the broker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMessage {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub key: Option<Vec<u8>>,
    pub payload: Vec<u8>,
}

#[async_trait]
pub trait EventSource: Send {
    /// Next message, or `None` once the stream is exhausted
    ///
    /// Must be cancel-safe: the worker races it against the shutdown signal.
    async fn next_message(&mut self) -> JobResult<Option<SourceMessage>>;

    /// Mark `msg` (and everything before it on its partition) as handled
    async fn commit(&mut self, msg: &SourceMessage) -> JobResult<()>;

    /// Release the underlying reader
    async fn close(&mut self) -> JobResult<()>;
}
