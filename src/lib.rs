//! kv_instrument - Instrumented caching over a Redis-like key-value store
//!
//! Typed storage under generated keys, call counting and call history around
//! store operations, replay of recorded calls, and a TTL cache in front of
//! remote fetches. All state lives in the store; components share one
//! explicitly passed [`store::SharedStore`] handle.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod instrument;
pub mod replay;
pub mod store;

pub use cache::{CacheKey, StoredValue, TypedCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use fetch::{FetchCache, Fetcher, HttpFetcher};
pub use replay::{ReplayLog, Replayer};
pub use store::{KeyValueStore, MemoryStore, RedisStore, SharedStore};
