//! Review CDC job
//!
//! Consumes the review change stream and keeps the search index in step with
//! the relational store.
//!
//! - [`source`]: event source adapters
//! - [`indexer`]: projection of change rows onto review documents
//! - [`worker`]: the consume, index, commit loop

pub mod config;
pub mod error;
pub mod indexer;
pub mod source;
pub mod utils;
pub mod worker;

pub use config::Config;
pub use error::{JobError, JobResult};
pub use indexer::{ApplyOutcome, DocumentIndexer};
pub use source::{ChannelSource, EventSource, JsonlSource, SourceMessage};
pub use utils::{init_logger, init_logger_with_file};
pub use worker::{IndexWorker, WorkerStats};
