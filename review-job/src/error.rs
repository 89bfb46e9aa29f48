//! review-job error type

use shared::search::IndexError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    /// The event source failed to deliver or commit a message
    #[error("source error: {0}")]
    Source(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("index error: {0}")]
    Index(#[from] IndexError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type JobResult<T> = Result<T, JobError>;
