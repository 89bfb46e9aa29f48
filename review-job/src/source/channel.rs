//! In-process channel source

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use super::{EventSource, SourceMessage};
use crate::error::{JobError, JobResult};

/// Offsets committed by a [`ChannelSource`], shared with whoever feeds it
#[derive(Debug, Clone, Default)]
pub struct CommitLog {
    offsets: Arc<Mutex<Vec<i64>>>,
}

impl CommitLog {
    pub fn offsets(&self) -> Vec<i64> {
        self.offsets
            .lock()
            .map(|o| o.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<i64> {
        self.offsets.lock().ok().and_then(|o| o.last().copied())
    }

    fn push(&self, offset: i64) -> JobResult<()> {
        self.offsets
            .lock()
            .map(|mut o| o.push(offset))
            .map_err(|_| JobError::Source("commit log poisoned".into()))
    }
}

/// Source fed through a `tokio::sync::mpsc` channel
///
/// Payloads get consecutive offsets on partition 0. The stream ends when every
/// sender is dropped.
pub struct ChannelSource {
    topic: String,
    rx: mpsc::Receiver<Vec<u8>>,
    next_offset: i64,
    commits: CommitLog,
}

impl ChannelSource {
    /// Create a source and the sender that feeds it
    pub fn new(topic: impl Into<String>, capacity: usize) -> (Self, mpsc::Sender<Vec<u8>>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::from_receiver(topic, rx), tx)
    }

    pub fn from_receiver(topic: impl Into<String>, rx: mpsc::Receiver<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            rx,
            next_offset: 0,
            commits: CommitLog::default(),
        }
    }

    pub fn commit_log(&self) -> CommitLog {
        self.commits.clone()
    }
}

#[async_trait]
impl EventSource for ChannelSource {
    async fn next_message(&mut self) -> JobResult<Option<SourceMessage>> {
        let Some(payload) = self.rx.recv().await else {
            return Ok(None);
        };
        let offset = self.next_offset;
        self.next_offset += 1;
        Ok(Some(SourceMessage {
            topic: self.topic.clone(),
            partition: 0,
            offset,
            key: None,
            payload,
        }))
    }

    async fn commit(&mut self, msg: &SourceMessage) -> JobResult<()> {
        self.commits.push(msg.offset)
    }

    async fn close(&mut self) -> JobResult<()> {
        self.rx.close();
        Ok(())
    }
}
