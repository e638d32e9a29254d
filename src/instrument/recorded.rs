//! Call history wrapper.

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::instrument::{history_keys, CacheOperation};
use crate::store::SharedStore;

/// Appends the call's arguments to `<name>:inputs` before delegating and its
/// result to `<name>:outputs` after.
///
/// A failed call leaves its input record without a matching output record;
/// the error is returned unchanged.
pub struct Recorded<Op> {
    inner: Op,
    store: SharedStore,
    inputs_key: String,
    outputs_key: String,
}

impl<Op: CacheOperation> Recorded<Op> {
    /// Wraps `inner`, recording into `store`.
    pub fn new(inner: Op, store: SharedStore) -> Self {
        let (inputs_key, outputs_key) = history_keys(inner.name());
        Self {
            inner,
            store,
            inputs_key,
            outputs_key,
        }
    }

    /// The wrapped operation.
    pub fn inner(&self) -> &Op {
        &self.inner
    }

    /// Number of calls recorded so far, successful or not.
    pub async fn recorded_calls(&self) -> Result<usize> {
        self.store.llen(&self.inputs_key).await
    }
}

#[async_trait]
impl<Op: CacheOperation> CacheOperation for Recorded<Op> {
    type Input = Op::Input;
    type Output = Op::Output;

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn call(&self, input: Self::Input) -> Result<Self::Output> {
        let rendered = serde_json::to_string(&input)?;
        self.store.rpush(&self.inputs_key, rendered.as_bytes()).await?;

        let output = self.inner.call(input).await?;

        let rendered = serde_json::to_string(&output)?;
        self.store.rpush(&self.outputs_key, rendered.as_bytes()).await?;
        debug!(operation = self.inner.name(), "call recorded");

        Ok(output)
    }
}
