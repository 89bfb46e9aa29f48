//! JSON-lines source
//!
//! Reads one broker message per line, e.g. piped from a console consumer or
//! replayed from a capture file. Offsets are zero-based line numbers on
//! partition 0; blank lines are skipped but still consume an offset.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};

use super::{EventSource, SourceMessage};
use crate::error::JobResult;

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;

pub struct JsonlSource {
    topic: String,
    origin: String,
    lines: Option<Lines<BufReader<BoxedReader>>>,
    line_no: i64,
    committed: Option<i64>,
}

impl JsonlSource {
    /// Read messages from a file
    pub async fn open(path: impl AsRef<Path>, topic: impl Into<String>) -> JobResult<Self> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let file = tokio::fs::File::open(&path).await?;
        Ok(Self::from_reader(
            Box::new(file),
            path.display().to_string(),
            topic,
        ))
    }

    /// Read messages from standard input
    pub fn stdin(topic: impl Into<String>) -> Self {
        Self::from_reader(Box::new(tokio::io::stdin()), "stdin".into(), topic)
    }

    pub fn from_reader(reader: BoxedReader, origin: String, topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            origin,
            lines: Some(BufReader::new(reader).lines()),
            line_no: 0,
            committed: None,
        }
    }

    /// Offset of the last committed line
    pub fn committed_offset(&self) -> Option<i64> {
        self.committed
    }
}

#[async_trait]
impl EventSource for JsonlSource {
    async fn next_message(&mut self) -> JobResult<Option<SourceMessage>> {
        let Some(lines) = self.lines.as_mut() else {
            return Ok(None);
        };
        // `next_line` is cancel-safe, so a line is never half-consumed
        while let Some(line) = lines.next_line().await? {
            let offset = self.line_no;
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Ok(Some(SourceMessage {
                topic: self.topic.clone(),
                partition: 0,
                offset,
                key: None,
                payload: line.into_bytes(),
            }));
        }
        tracing::debug!(origin = %self.origin, lines = self.line_no, "Reached end of input");
        Ok(None)
    }

    async fn commit(&mut self, msg: &SourceMessage) -> JobResult<()> {
        self.committed = Some(msg.offset);
        Ok(())
    }

    async fn close(&mut self) -> JobResult<()> {
        self.lines = None;
        tracing::debug!(origin = %self.origin, committed = ?self.committed, "Source closed");
        Ok(())
    }
}
