//! Fetch Cache Module
//!
//! Puts a short-lived store-backed cache in front of a remote fetch and counts
//! every access per resource.
//!
//! # Store layout
//! - `count:<url>` - access counter, incremented on every fetch (hits included)
//! - `<url>` - cached content, written with `SETEX` on a miss
//!
//! Per resource: Uncached -> (fetch) -> Cached with TTL running -> (expiry) -> Uncached.
//! There is no invalidation; expiry is the only way back.

mod http;
mod stats;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{CacheError, Result};
use crate::instrument::call_count;
use crate::store::SharedStore;

pub use http::HttpFetcher;
pub use stats::FetchStats;

/// Default TTL in seconds for cached content.
pub const DEFAULT_PAGE_TTL: u64 = 10;

// == Fetcher ==
/// Maps a resource identifier to its textual content.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Key of the access counter for `url`.
pub fn count_key(url: &str) -> String {
    format!("count:{url}")
}

// == Fetch Cache ==
/// TTL cache and access counter in front of a [`Fetcher`].
pub struct FetchCache<F> {
    store: SharedStore,
    fetcher: F,
    ttl: u64,
    stats: Mutex<FetchStats>,
}

impl<F: Fetcher> FetchCache<F> {
    /// Creates a fetch cache with the default TTL.
    pub fn new(store: SharedStore, fetcher: F) -> Self {
        Self {
            store,
            fetcher,
            ttl: DEFAULT_PAGE_TTL,
            stats: Mutex::new(FetchStats::new()),
        }
    }

    /// Sets the TTL in seconds for content cached from now on.
    ///
    /// The store refuses a zero expiry, so `0` is raised to one second.
    pub fn with_ttl(mut self, ttl_secs: u64) -> Self {
        self.ttl = ttl_secs.max(1);
        self
    }

    /// TTL in seconds applied to newly cached content.
    pub fn ttl(&self) -> u64 {
        self.ttl
    }

    /// The wrapped fetcher.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    // == Fetch ==
    /// Returns the content of `url`, from the store when cached.
    ///
    /// The access counter is incremented first, on hits and misses alike.
    /// A fetcher failure is returned as is and nothing is cached.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let count = self.store.incr(&count_key(url)).await?;

        if let Some(cached) = self.store.get(url).await? {
            self.stats.lock().await.record_hit();
            debug!(url, count, "fetch cache hit");
            return String::from_utf8(cached).map_err(|_| CacheError::InvalidText(url.to_string()));
        }

        self.stats.lock().await.record_miss();
        let content = self.fetcher.fetch(url).await?;
        self.store.setex(url, self.ttl, content.as_bytes()).await?;
        info!(url, count, ttl = self.ttl, "fetch cache miss, content cached");

        Ok(content)
    }

    /// Number of fetches requested for `url` across every process sharing the store.
    pub async fn access_count(&self, url: &str) -> Result<i64> {
        call_count(self.store.as_ref(), &count_key(url)).await
    }

    /// Hits and misses seen by this instance.
    pub async fn stats(&self) -> FetchStats {
        self.stats.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Serves a fixed page and counts how often it was asked.
    struct StaticPage {
        body: &'static str,
        calls: AtomicUsize,
    }

    impl StaticPage {
        fn new(body: &'static str) -> Self {
            Self {
                body,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Fetcher for StaticPage {
        async fn fetch(&self, _url: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.body.to_string())
        }
    }

    struct Unreachable;

    #[async_trait]
    impl Fetcher for Unreachable {
        async fn fetch(&self, url: &str) -> Result<String> {
            Err(CacheError::Fetch(format!("{url}: connection refused")))
        }
    }

    #[test]
    fn test_count_key() {
        assert_eq!(count_key("http://x"), "count:http://x");
    }

    #[tokio::test]
    async fn test_second_fetch_within_ttl_is_cached() {
        let cache = FetchCache::new(Arc::new(MemoryStore::new()), StaticPage::new("hello"));

        assert_eq!(cache.fetch("u").await.unwrap(), "hello");
        assert_eq!(cache.fetch("u").await.unwrap(), "hello");

        assert_eq!(cache.fetcher().calls(), 1);
        assert_eq!(cache.access_count("u").await.unwrap(), 2);

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_content_cached_with_ttl() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let cache = FetchCache::new(store.clone(), StaticPage::new("hello")).with_ttl(1);
        assert_eq!(cache.ttl(), 1);

        cache.fetch("http://x").await.unwrap();
        assert_eq!(store.get("http://x").await.unwrap(), Some(b"hello".to_vec()));

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(store.get("http://x").await.unwrap(), None);

        cache.fetch("http://x").await.unwrap();
        assert_eq!(cache.fetcher().calls(), 2);
        assert_eq!(cache.access_count("http://x").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_zero_ttl_still_caches() {
        let cache = FetchCache::new(Arc::new(MemoryStore::new()), StaticPage::new("hello")).with_ttl(0);
        assert_eq!(cache.ttl(), 1);

        cache.fetch("u").await.unwrap();
        cache.fetch("u").await.unwrap();
        assert_eq!(cache.fetcher().calls(), 1);
    }

    #[tokio::test]
    async fn test_counters_are_per_resource() {
        let cache = FetchCache::new(Arc::new(MemoryStore::new()), StaticPage::new("page"));

        cache.fetch("a").await.unwrap();
        cache.fetch("a").await.unwrap();
        cache.fetch("b").await.unwrap();

        assert_eq!(cache.access_count("a").await.unwrap(), 2);
        assert_eq!(cache.access_count("b").await.unwrap(), 1);
        assert_eq!(cache.access_count("never").await.unwrap(), 0);
        assert_eq!(cache.fetcher().calls(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_counted_not_cached() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let cache = FetchCache::new(store.clone(), Unreachable);

        let result = cache.fetch("http://down").await;
        assert!(matches!(result, Err(CacheError::Fetch(_))));
        assert_eq!(cache.access_count("http://down").await.unwrap(), 1);
        assert_eq!(store.get("http://down").await.unwrap(), None);
    }
}
