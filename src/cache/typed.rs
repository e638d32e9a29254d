//! Typed Cache Module
//!
//! Stores primitive values under generated keys and reads them back with
//! caller-chosen decoders. Every `store` call is counted and recorded.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::cache::value::{decode_float_lenient, decode_integer_lenient, CacheKey, StoredValue};
use crate::error::{CacheError, Result};
use crate::instrument::{call_count, CacheOperation, Counted, OperationExt, Recorded};
use crate::store::SharedStore;

/// Qualified name of the instrumented store operation.
pub const STORE_OPERATION: &str = "TypedCache::store";

// == Store Operation ==
/// Writes one value under a freshly generated key.
pub struct StoreOperation {
    store: SharedStore,
}

impl StoreOperation {
    /// Creates the operation over `store`.
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CacheOperation for StoreOperation {
    type Input = (StoredValue,);
    type Output = CacheKey;

    fn name(&self) -> &str {
        STORE_OPERATION
    }

    async fn call(&self, input: Self::Input) -> Result<Self::Output> {
        let (value,) = input;
        let key = CacheKey::generate();
        self.store.set(key.as_str(), &value.to_bytes()).await?;
        Ok(key)
    }
}

// == Typed Cache ==
/// Typed front end over the shared store.
pub struct TypedCache {
    store: SharedStore,
    store_op: Recorded<Counted<StoreOperation>>,
}

impl TypedCache {
    // == Constructor ==
    /// Creates a cache over `store`, flushing every existing key first.
    ///
    /// The flush is destructive for the whole namespace. Never point a
    /// `TypedCache` at a store shared with unrelated data.
    pub async fn new(store: SharedStore) -> Result<Self> {
        store.flush_all().await?;
        warn!("store flushed for new typed cache");

        let store_op = StoreOperation::new(store.clone())
            .counted(store.clone())
            .recorded(store.clone());

        info!("typed cache ready");
        Ok(Self { store, store_op })
    }

    // == Store ==
    /// Stores `value` under a new unique key and returns the key.
    pub async fn store(&self, value: impl Into<StoredValue>) -> Result<CacheKey> {
        let key = self.store_op.call((value.into(),)).await?;
        debug!(%key, "value stored");
        Ok(key)
    }

    // == Get ==
    /// Returns the raw bytes under `key`, or `None` when absent.
    pub async fn get(&self, key: impl AsRef<str>) -> Result<Option<Vec<u8>>> {
        self.store.get(key.as_ref()).await
    }

    /// Returns the value under `key` passed through `decode`, or `None` when absent.
    pub async fn get_with<T, F>(&self, key: impl AsRef<str>, decode: F) -> Result<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> T,
    {
        Ok(self.get(key).await?.map(decode))
    }

    /// Returns the value under `key` as UTF-8 text.
    ///
    /// Bytes that are not valid UTF-8 fail with [`CacheError::InvalidText`].
    pub async fn get_as_text(&self, key: impl AsRef<str>) -> Result<Option<String>> {
        let key = key.as_ref();
        match self.get(key).await? {
            None => Ok(None),
            Some(raw) => String::from_utf8(raw)
                .map(Some)
                .map_err(|_| CacheError::InvalidText(key.to_string())),
        }
    }

    /// Returns the value under `key` as an integer.
    ///
    /// Non-strict: content that is not a decimal integer decodes to `0`.
    pub async fn get_as_integer(&self, key: impl AsRef<str>) -> Result<Option<i64>> {
        self.get_with(key, |raw| decode_integer_lenient(&raw)).await
    }

    /// Returns the value under `key` as a float. Non-strict: malformed content is `0.0`.
    pub async fn get_as_float(&self, key: impl AsRef<str>) -> Result<Option<f64>> {
        self.get_with(key, |raw| decode_float_lenient(&raw)).await
    }

    // == Instrumentation ==
    /// Number of `store` calls made against this namespace.
    pub async fn store_call_count(&self) -> Result<i64> {
        call_count(self.store.as_ref(), STORE_OPERATION).await
    }

    /// The shared store handle, for wiring replay or fetch caching.
    pub fn store_handle(&self) -> SharedStore {
        self.store.clone()
    }
}
