//! Store Module
//!
//! The command contract of the external key-value service, plus two bindings:
//! a Redis client and an in-process stand-in.

mod entry;
mod memory;
mod redis_store;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

// Re-export public types
pub use self::entry::{EntryValue, StoreEntry};
pub use self::memory::{Keyspace, MemoryStore};
pub use self::redis_store::RedisStore;

// == Key-Value Store ==
/// Commands consumed from the key-value service.
///
/// Semantics (atomicity, TTL granularity, eviction) are those of the service.
/// `incr` is atomic at the store; callers never read-modify-write.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// `SET key value`
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// `GET key`. `None` when the key is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// `SETEX key ttl value`, TTL in seconds.
    async fn setex(&self, key: &str, ttl_secs: u64, value: &[u8]) -> Result<()>;

    /// `INCR key`, returning the value after the increment.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// `RPUSH key value`, returning the list length after the push.
    async fn rpush(&self, key: &str, value: &[u8]) -> Result<usize>;

    /// `LRANGE key start stop`, both bounds inclusive, negatives from the end.
    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>>;

    /// `LLEN key`
    async fn llen(&self, key: &str) -> Result<usize>;

    /// `FLUSHALL`. Destroys every key in the namespace.
    async fn flush_all(&self) -> Result<()>;
}

/// Store handle shared by the cache, the instrumentation and the fetch cache.
pub type SharedStore = Arc<dyn KeyValueStore>;
