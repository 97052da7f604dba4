use arc_swap::ArcSwapOption;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::tmdb::TmdbError;

struct Entry<T> {
    value: Arc<T>,
    fetched_at: Instant,
}

/// Result of one named query, kept for `ttl`. Failed fetches are not stored.
pub struct CachedQuery<T> {
    name: String,
    ttl: Duration,
    slot: ArcSwapOption<Entry<T>>,
}

impl<T> CachedQuery<T> {
    pub fn new(name: impl Into<String>, ttl: Duration) -> Self {
        Self {
            name: name.into(),
            ttl,
            slot: ArcSwapOption::empty(),
        }
    }

    pub fn fresh(&self) -> Option<Arc<T>> {
        if self.ttl.is_zero() {
            return None;
        }
        let entry = self.slot.load_full()?;
        if entry.fetched_at.elapsed() < self.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    pub fn is_stale(&self) -> bool {
        self.fresh().is_none()
    }

    pub fn store(&self, value: Arc<T>) {
        if self.ttl.is_zero() {
            return;
        }
        self.slot.store(Some(Arc::new(Entry {
            value,
            fetched_at: Instant::now(),
        })));
    }

    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<Arc<T>, TmdbError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, TmdbError>>,
    {
        if let Some(value) = self.fresh() {
            debug!(query = %self.name, "Cache hit");
            return Ok(value);
        }

        match fetch().await {
            Ok(value) => {
                let value = Arc::new(value);
                self.store(value.clone());
                Ok(value)
            }
            Err(e) => {
                warn!(query = %self.name, error = %e, "Query failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn parse_error() -> TmdbError {
        TmdbError::Parse(serde_json::from_str::<u32>("x").unwrap_err())
    }

    #[tokio::test]
    async fn test_fresh_value_is_reused() {
        let cache = CachedQuery::new("movies/popular", Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_fetch(|| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok::<_, TmdbError>(42) }
                })
                .await
                .unwrap();
            assert_eq!(*value, 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_ttl_always_fetches() {
        let cache = CachedQuery::new("movies/popular", Duration::ZERO);
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            cache
                .get_or_fetch(|| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok::<_, TmdbError>(1) }
                })
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(cache.is_stale());
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let cache = CachedQuery::<u32>::new("movies/upcoming", Duration::from_secs(60));

        let err = cache.get_or_fetch(|| async { Err(parse_error()) }).await;
        assert!(err.is_err());
        assert!(cache.fresh().is_none());

        let value = cache.get_or_fetch(|| async { Ok(7) }).await.unwrap();
        assert_eq!(*value, 7);
        assert_eq!(cache.fresh().as_deref(), Some(&7));
    }

    #[tokio::test]
    async fn test_expired_entry_refetches() {
        let cache = CachedQuery::new("movies/topRated", Duration::from_millis(20));
        cache.store(Arc::new(1));
        assert_eq!(cache.fresh().as_deref(), Some(&1));

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.is_stale());

        let value = cache.get_or_fetch(|| async { Ok(2) }).await.unwrap();
        assert_eq!(*value, 2);
    }
}
