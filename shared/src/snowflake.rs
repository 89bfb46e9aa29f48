//! Snowflake ID generator
//!
//! Layout (63 bits, always positive as `i64`):
//!   - 41 bits: milliseconds since the configured epoch (~69 years)
//!   - 10 bits: node id (1..=1023)
//!   - 12 bits: per-millisecond sequence (4096 ids/ms per node)
//!
//! The generator keeps `(millis << 12) | sequence` in one atomic word and
//! advances it with compare-and-swap, so ids from one generator are strictly
//! increasing across threads without a lock. When the sequence of a
//! millisecond is exhausted, or the wall clock steps backwards, the logical
//! clock keeps moving forward from the last issued value instead of waiting.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::NaiveDate;
use thiserror::Error;

const NODE_BITS: u32 = 10;
const STEP_BITS: u32 = 12;
const MAX_NODE_ID: i64 = (1 << NODE_BITS) - 1;
const STEP_MASK: i64 = (1 << STEP_BITS) - 1;
const TIME_SHIFT: u32 = NODE_BITS + STEP_BITS;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdGenError {
    #[error("invalid snowflake config: {0}")]
    InvalidConfig(String),
}

/// Snowflake generator bound to one epoch and one node id
#[derive(Debug)]
pub struct IdGenerator {
    epoch_ms: i64,
    node_id: i64,
    state: AtomicI64,
}

impl IdGenerator {
    /// Build a generator from an epoch date (`YYYY-MM-DD`, UTC midnight) and a node id.
    pub fn new(epoch: &str, node_id: i64) -> Result<Self, IdGenError> {
        if epoch.is_empty() {
            return Err(IdGenError::InvalidConfig("epoch must not be empty".into()));
        }
        if node_id <= 0 || node_id > MAX_NODE_ID {
            return Err(IdGenError::InvalidConfig(format!(
                "node id {node_id} outside 1..={MAX_NODE_ID}"
            )));
        }
        let date = NaiveDate::parse_from_str(epoch, "%Y-%m-%d").map_err(|e| {
            IdGenError::InvalidConfig(format!("epoch {epoch:?} is not YYYY-MM-DD: {e}"))
        })?;
        let epoch_ms = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| IdGenError::InvalidConfig(format!("epoch {epoch} has no midnight")))?
            .and_utc()
            .timestamp_millis();
        if epoch_ms > crate::util::now_millis() {
            return Err(IdGenError::InvalidConfig(format!(
                "epoch {epoch} is in the future"
            )));
        }

        Ok(Self {
            epoch_ms,
            node_id,
            state: AtomicI64::new(0),
        })
    }

    pub fn node_id(&self) -> i64 {
        self.node_id
    }

    /// Allocate the next id.
    pub fn next_id(&self) -> i64 {
        let now = crate::util::now_millis() - self.epoch_ms;
        let mut current = self.state.load(Ordering::Relaxed);
        loop {
            let next = if now > current >> STEP_BITS {
                now << STEP_BITS
            } else {
                current + 1
            };
            match self
                .state
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => {
                    let millis = next >> STEP_BITS;
                    let step = next & STEP_MASK;
                    return (millis << TIME_SHIFT) | (self.node_id << STEP_BITS) | step;
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// Millisecond timestamp (unix) encoded in an id from this generator.
    pub fn timestamp_of(&self, id: i64) -> i64 {
        (id >> TIME_SHIFT) + self.epoch_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_rejects_invalid_config() {
        assert!(IdGenerator::new("", 1).is_err());
        assert!(IdGenerator::new("2024-01-01", 0).is_err());
        assert!(IdGenerator::new("2024-01-01", 1024).is_err());
        assert!(IdGenerator::new("2024/01/01", 1).is_err());
        assert!(IdGenerator::new("2999-01-01", 1).is_err());
    }

    #[test]
    fn test_ids_are_strictly_increasing() {
        let generator = IdGenerator::new("2024-01-01", 1).unwrap();
        let mut last = 0;
        for _ in 0..10_000 {
            let id = generator.next_id();
            assert!(id > last);
            last = id;
        }
    }

    #[test]
    fn test_id_embeds_node_and_time() {
        let generator = IdGenerator::new("2024-01-01", 7).unwrap();
        let before = crate::util::now_millis();
        let id = generator.next_id();
        assert_eq!((id >> STEP_BITS) & MAX_NODE_ID, 7);
        assert!(generator.timestamp_of(id) >= before - 1);
    }

    #[test]
    fn test_concurrent_ids_are_unique() {
        let generator = Arc::new(IdGenerator::new("2024-01-01", 3).unwrap());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let generator = generator.clone();
                std::thread::spawn(move || (0..5_000).map(|_| generator.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 40_000);
    }
}
