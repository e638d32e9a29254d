//! Redis binding of the store contract.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use tracing::info;

use crate::error::Result;
use crate::store::KeyValueStore;

/// Redis-backed store over a multiplexed async connection.
///
/// The connection is cloned per command; clones share one socket and
/// pipeline commands in arrival order.
#[derive(Clone)]
pub struct RedisStore {
    conn: MultiplexedConnection,
}

impl RedisStore {
    /// Opens a connection to the server at `url` (e.g. `redis://127.0.0.1:6379`).
    pub async fn connect(url: &str) -> Result<Self> {
        let client = Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        info!(url, "connected to redis");
        Ok(Self { conn })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    async fn setex(&self, key: &str, ttl_secs: u64, value: &[u8]) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(key, value, ttl_secs).await?;
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut conn = self.conn.clone();
        let value: i64 = conn.incr(key, 1).await?;
        Ok(value)
    }

    async fn rpush(&self, key: &str, value: &[u8]) -> Result<usize> {
        let mut conn = self.conn.clone();
        let len: usize = conn.rpush(key, value).await?;
        Ok(len)
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let items: Vec<Vec<u8>> = conn.lrange(key, start, stop).await?;
        Ok(items)
    }

    async fn llen(&self, key: &str) -> Result<usize> {
        let mut conn = self.conn.clone();
        let len: usize = conn.llen(key).await?;
        Ok(len)
    }

    async fn flush_all(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("FLUSHALL").query_async(&mut conn).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_invalid_url() {
        let result = RedisStore::connect("not-a-url").await;
        assert!(matches!(
            result,
            Err(crate::error::CacheError::StoreUnavailable(_))
        ));
    }

    #[tokio::test]
    #[ignore = "requires a running redis server on 127.0.0.1:6379"]
    async fn test_live_round_trip() {
        let store = RedisStore::connect("redis://127.0.0.1:6379").await.unwrap();
        store.flush_all().await.unwrap();

        store.set("key", b"value").await.unwrap();
        assert_eq!(store.get("key").await.unwrap(), Some(b"value".to_vec()));
        assert_eq!(store.incr("counter").await.unwrap(), 1);
        assert_eq!(store.rpush("list", b"a").await.unwrap(), 1);
        assert_eq!(store.lrange("list", 0, -1).await.unwrap(), vec![b"a".to_vec()]);
        assert_eq!(store.llen("list").await.unwrap(), 1);

        store.flush_all().await.unwrap();
        assert_eq!(store.get("key").await.unwrap(), None);
    }
}
