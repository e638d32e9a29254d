//! Invocation counting wrapper.

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::instrument::CacheOperation;
use crate::store::SharedStore;

/// Increments `<name>` once per call, before the wrapped operation runs.
///
/// The count reflects attempts: a call that fails afterwards is still counted.
pub struct Counted<Op> {
    inner: Op,
    store: SharedStore,
}

impl<Op: CacheOperation> Counted<Op> {
    /// Wraps `inner`, counting into `store`.
    pub fn new(inner: Op, store: SharedStore) -> Self {
        Self { inner, store }
    }

    /// The wrapped operation.
    pub fn inner(&self) -> &Op {
        &self.inner
    }
}

#[async_trait]
impl<Op: CacheOperation> CacheOperation for Counted<Op> {
    type Input = Op::Input;
    type Output = Op::Output;

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn call(&self, input: Self::Input) -> Result<Self::Output> {
        let count = self.store.incr(self.inner.name()).await?;
        debug!(operation = self.inner.name(), count, "call counted");
        self.inner.call(input).await
    }
}
