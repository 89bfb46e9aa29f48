//! Response cache
//!
//! The list-by-store path caches serialized search pages by key. The cache is
//! best-effort: a backend failure reads as a miss and a failed write is only
//! logged, so callers never depend on it for correctness.
//!
//! - [`CacheStore`]: backend abstraction (`Ok(None)` = not found, `Err` = unavailable)
//! - [`MokaCache`]: in-process TTL cache built on `moka`
//! - [`Coalescer`]: collapses concurrent misses for one key into a single fetch

mod coalesce;

pub use coalesce::Coalescer;

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Default cache capacity (number of entries)
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// TTL of a cached store-review page
pub const PAGE_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

/// Key/value byte cache with per-entry TTL
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// `Ok(None)` when the key is absent or expired
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;
}

/// Cached bytes with the TTL they were written with
#[derive(Clone, Debug)]
struct CachedEntry {
    bytes: Vec<u8>,
    ttl: Duration,
}

/// Expire each entry after its own TTL
struct PerEntryTtl;

impl Expiry<String, CachedEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// [`CacheStore`] backed by a `moka` future cache
#[derive(Clone)]
pub struct MokaCache {
    inner: Cache<String, CachedEntry>,
}

impl MokaCache {
    pub fn new(capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { inner }
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

impl Default for MokaCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[async_trait]
impl CacheStore for MokaCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.inner.get(key).await.map(|entry| entry.bytes))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        self.inner
            .insert(key.to_string(), CachedEntry { bytes: value, ttl })
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = MokaCache::default();
        assert_eq!(cache.get("k").await.unwrap(), None);

        cache.set("k", b"page".to_vec(), PAGE_TTL).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some(b"page".to_vec()));
        assert_eq!(cache.get("other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache = MokaCache::default();
        cache
            .set("short", b"x".to_vec(), Duration::from_millis(50))
            .await
            .unwrap();
        cache.set("long", b"y".to_vec(), PAGE_TTL).await.unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(cache.get("short").await.unwrap(), None);
        assert_eq!(cache.get("long").await.unwrap(), Some(b"y".to_vec()));
    }
}
