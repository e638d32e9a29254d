//! Memory Store Module
//!
//! In-process keyspace honouring the same command contract as the Redis binding.
//! Byte-string and list values, lazy TTL expiry, atomic increments.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::store::entry::{EntryValue, StoreEntry};
use crate::store::KeyValueStore;

// == Keyspace ==
/// Synchronous keyspace. Every method is a single store command.
#[derive(Debug, Default)]
pub struct Keyspace {
    /// Key-value storage
    entries: HashMap<String, StoreEntry>,
}

impl Keyspace {
    // == Constructor ==
    /// Creates an empty keyspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for `key`, dropping it first if it has expired.
    fn live_entry(&mut self, key: &str) -> Option<&mut StoreEntry> {
        if self.entries.get(key).is_some_and(StoreEntry::is_expired) {
            self.entries.remove(key);
            debug!(key, "expired entry removed on access");
            return None;
        }
        self.entries.get_mut(key)
    }

    // == Set ==
    /// Stores a byte string, replacing any previous value and TTL.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL in seconds (None = never expires)
    pub fn set(&mut self, key: &str, value: &[u8], ttl: Option<u64>) {
        let entry = StoreEntry::new(EntryValue::Bytes(value.to_vec()), ttl);
        self.entries.insert(key.to_string(), entry);
    }

    // == Get ==
    /// Retrieves a byte string. Absent or expired keys yield `None`.
    pub fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.live_entry(key) {
            None => Ok(None),
            Some(entry) => match &entry.value {
                EntryValue::Bytes(bytes) => Ok(Some(bytes.clone())),
                other => Err(wrong_type(key, other)),
            },
        }
    }

    // == Incr ==
    /// Increments the decimal integer at `key` by one and returns the new value.
    ///
    /// A missing key counts as `0`. The entry's TTL is left untouched.
    pub fn incr(&mut self, key: &str) -> Result<i64> {
        let Some(entry) = self.live_entry(key) else {
            self.set(key, b"1", None);
            return Ok(1);
        };

        let current = match &entry.value {
            EntryValue::Bytes(bytes) => std::str::from_utf8(bytes)
                .ok()
                .and_then(|s| s.parse::<i64>().ok())
                .ok_or_else(|| CacheError::NotAnInteger(key.to_string()))?,
            other => return Err(wrong_type(key, other)),
        };

        let next = current
            .checked_add(1)
            .ok_or_else(|| CacheError::NotAnInteger(format!("{key}: increment would overflow")))?;
        entry.value = EntryValue::Bytes(next.to_string().into_bytes());
        Ok(next)
    }

    // == Rpush ==
    /// Appends to the list at `key`, creating it if needed. Returns the new length.
    pub fn rpush(&mut self, key: &str, value: &[u8]) -> Result<usize> {
        match self.live_entry(key) {
            None => {
                let entry = StoreEntry::new(EntryValue::List(vec![value.to_vec()]), None);
                self.entries.insert(key.to_string(), entry);
                Ok(1)
            }
            Some(entry) => match &mut entry.value {
                EntryValue::List(items) => {
                    items.push(value.to_vec());
                    Ok(items.len())
                }
                other => Err(wrong_type(key, other)),
            },
        }
    }

    // == Lrange ==
    /// Returns list items between `start` and `stop`, both inclusive.
    ///
    /// Negative indices count from the end (`-1` is the last item). Out of
    /// range bounds are clamped; an inverted range is empty.
    pub fn lrange(&mut self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        let items = match self.live_entry(key) {
            None => return Ok(Vec::new()),
            Some(entry) => match &entry.value {
                EntryValue::List(items) => items,
                other => return Err(wrong_type(key, other)),
            },
        };

        let len = items.len() as isize;
        let start = if start < 0 { (len + start).max(0) } else { start };
        let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

        if start > stop || start >= len {
            return Ok(Vec::new());
        }
        Ok(items[start as usize..=stop as usize].to_vec())
    }

    // == Llen ==
    /// Returns the length of the list at `key`, `0` when absent.
    pub fn llen(&mut self, key: &str) -> Result<usize> {
        match self.live_entry(key) {
            None => Ok(0),
            Some(entry) => match &entry.value {
                EntryValue::List(items) => Ok(items.len()),
                other => Err(wrong_type(key, other)),
            },
        }
    }

    // == Flush ==
    /// Removes every entry. Returns the number of entries removed.
    pub fn flush(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    // == Length ==
    /// Returns the number of entries, expired ones included until touched.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the keyspace holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn wrong_type(key: &str, found: &EntryValue) -> CacheError {
    CacheError::WrongType(format!("key '{}' holds a {}", key, found.kind()))
}

// == Memory Store ==
/// Thread-safe in-process store.
///
/// Every command takes the write lock, so each primitive is atomic and
/// observed in a single total order, as with a real server.
#[derive(Debug, Default)]
pub struct MemoryStore {
    keyspace: RwLock<Keyspace>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of keys currently held.
    pub async fn len(&self) -> usize {
        self.keyspace.read().await.len()
    }

    /// Returns true if no keys are held.
    pub async fn is_empty(&self) -> bool {
        self.keyspace.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.keyspace.write().await.set(key, value, None);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        // Write lock: an expired entry is removed on access
        self.keyspace.write().await.get(key)
    }

    async fn setex(&self, key: &str, ttl_secs: u64, value: &[u8]) -> Result<()> {
        // Same refusal as the server: a zero expiry is not a valid SETEX
        if ttl_secs == 0 {
            return Err(CacheError::StoreUnavailable(
                "invalid expire time in 'setex' command".to_string(),
            ));
        }
        self.keyspace.write().await.set(key, value, Some(ttl_secs));
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        self.keyspace.write().await.incr(key)
    }

    async fn rpush(&self, key: &str, value: &[u8]) -> Result<usize> {
        self.keyspace.write().await.rpush(key, value)
    }

    async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<Vec<u8>>> {
        self.keyspace.write().await.lrange(key, start, stop)
    }

    async fn llen(&self, key: &str) -> Result<usize> {
        self.keyspace.write().await.llen(key)
    }

    async fn flush_all(&self) -> Result<()> {
        let removed = self.keyspace.write().await.flush();
        debug!(removed, "memory store flushed");
        Ok(())
    }
}
