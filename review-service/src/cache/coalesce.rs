//! Request coalescing
//!
//! 同一个 key 同时只有一个后端请求在执行，其余调用方共享它的结果（成功或错误）。
//!
//! Each fetch is driven by its own task, so it runs to completion and leaves
//! the registry even when every caller has gone away. Coalescing therefore
//! only spans one live fetch; later callers go back to the cache.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::future::Future;
use std::sync::Arc;

type InFlight<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;
type Registry<T, E> = Arc<DashMap<String, InFlight<T, E>>>;

/// Registry of in-flight fetches keyed by cache key
pub struct Coalescer<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    inflight: Registry<T, E>,
}

impl<T, E> Default for Coalescer<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self {
            inflight: Arc::new(DashMap::new()),
        }
    }
}

impl<T, E> Coalescer<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `fetch` for `key`, or join the fetch already running for it
    ///
    /// `fetch` is only invoked by the caller that registers the key. Must be
    /// called from within a tokio runtime.
    pub async fn run<F, Fut>(&self, key: &str, fetch: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let shared = match self.inflight.entry(key.to_string()) {
            Entry::Occupied(entry) => {
                tracing::debug!(key = %key, "Joining in-flight fetch");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                let fut = fetch().boxed().shared();
                entry.insert(fut.clone());
                self.drive(key.to_string(), fut.clone());
                fut
            }
        };

        let result = shared.clone().await;
        // The driver may not have cleaned up yet; a later caller must not
        // receive this result from the registry
        release(&self.inflight, key, &shared);
        result
    }

    /// Poll the fetch to completion in the background, then drop its entry
    fn drive(&self, key: String, fut: InFlight<T, E>) {
        let registry = self.inflight.clone();
        tokio::spawn(async move {
            let _ = fut.clone().await;
            release(&registry, &key, &fut);
        });
    }

    /// Number of keys with a fetch in flight
    pub fn in_flight(&self) -> usize {
        self.inflight.len()
    }
}

/// Remove `key` only while it still maps to `fut`; a newer fetch may own it
fn release<T, E>(registry: &Registry<T, E>, key: &str, fut: &InFlight<T, E>)
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    registry.remove_if(key, |_, current| current.ptr_eq(fut));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrent_callers_share_one_fetch() {
        let coalescer: Arc<Coalescer<u32, String>> = Arc::new(Coalescer::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let coalescer = coalescer.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                coalescer
                    .run("review:7:0:10", move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        Ok(42)
                    })
                    .await
            }));
        }

        for h in handles {
            assert_eq!(h.await.unwrap(), Ok(42));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(coalescer.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_waiters_observe_the_same_error() {
        let coalescer: Arc<Coalescer<u32, String>> = Arc::new(Coalescer::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let coalescer = coalescer.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                coalescer
                    .run("k", move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Err::<u32, _>("index down".to_string())
                    })
                    .await
            }));
        }

        for h in handles {
            assert_eq!(h.await.unwrap(), Err("index down".to_string()));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_fetch_independently() {
        let coalescer: Coalescer<&'static str, String> = Coalescer::new();
        let a = coalescer.run("a", || async { Ok("a") });
        let b = coalescer.run("b", || async { Ok("b") });
        let (a, b) = tokio::join!(a, b);
        assert_eq!(a, Ok("a"));
        assert_eq!(b, Ok("b"));
    }

    #[tokio::test]
    async fn test_sequential_calls_fetch_again() {
        let coalescer: Coalescer<usize, String> = Coalescer::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            let got = coalescer.run("k", move || async move { Ok(n) }).await;
            assert_eq!(got, Ok(n));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_abandoned_fetch_does_not_serve_later_callers() {
        let coalescer: Coalescer<u32, String> = Coalescer::new();
        let finished = Arc::new(AtomicUsize::new(0));

        let done = finished.clone();
        let abandoned = tokio::time::timeout(
            Duration::from_millis(10),
            coalescer.run("k", move || async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                done.fetch_add(1, Ordering::SeqCst);
                Ok(1)
            }),
        )
        .await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(300)).await;
        // The fetch ran to completion without a caller and left the registry
        assert_eq!(finished.load(Ordering::SeqCst), 1);
        assert_eq!(coalescer.in_flight(), 0);

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let got = coalescer
            .run("k", move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(2)
            })
            .await;
        assert_eq!(got, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
