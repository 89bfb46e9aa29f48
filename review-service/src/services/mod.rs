//! Service layer
//!
//! - [`ReviewService`]: review/reply/appeal writes and audits against the store
//! - [`ReviewQueryEngine`]: cached, coalesced store listings from the index

pub mod query;
pub mod review;

pub use query::ReviewQueryEngine;
pub use review::ReviewService;
