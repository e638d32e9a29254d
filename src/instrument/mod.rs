//! Instrumentation Module
//!
//! Wrappers that add call counting and call history around any store-backed
//! operation. Each wrapper owns the operation it wraps and forwards to it
//! explicitly, so they nest in either order:
//!
//! ```ignore
//! let op = StoreOperation::new(store.clone())
//!     .counted(store.clone())
//!     .recorded(store.clone());
//! ```
//!
//! # Store layout
//! - `<name>` - invocation counter (`INCR`)
//! - `<name>:inputs` - JSON of each call's positional arguments (`RPUSH`)
//! - `<name>:outputs` - JSON of each call's result (`RPUSH`)

mod counted;
mod recorded;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{CacheError, Result};
use crate::store::{KeyValueStore, SharedStore};

pub use counted::Counted;
pub use recorded::Recorded;

// == Cache Operation ==
/// An operation that can be instrumented.
#[async_trait]
pub trait CacheOperation: Send + Sync {
    /// Positional arguments. Tuples serialize as a JSON array.
    type Input: Serialize + Send + Sync;
    /// Result of a successful call.
    type Output: Serialize + Send;

    /// Fully qualified name, used as the key namespace for counters and history.
    fn name(&self) -> &str;

    /// Runs the operation.
    async fn call(&self, input: Self::Input) -> Result<Self::Output>;
}

// == Operation Ext ==
/// Builder-style wrapping for any [`CacheOperation`].
pub trait OperationExt: CacheOperation + Sized {
    /// Wraps `self` so every call increments its invocation counter.
    fn counted(self, store: SharedStore) -> Counted<Self> {
        Counted::new(self, store)
    }

    /// Wraps `self` so every call records its input and output.
    fn recorded(self, store: SharedStore) -> Recorded<Self> {
        Recorded::new(self, store)
    }
}

impl<Op: CacheOperation> OperationExt for Op {}

/// Keys of the inputs and outputs lists for `name`.
pub fn history_keys(name: &str) -> (String, String) {
    (format!("{name}:inputs"), format!("{name}:outputs"))
}

/// Reads the invocation counter for `name`. Never-called operations report `0`.
pub async fn call_count(store: &dyn KeyValueStore, name: &str) -> Result<i64> {
    match store.get(name).await? {
        None => Ok(0),
        Some(raw) => std::str::from_utf8(&raw)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| CacheError::NotAnInteger(name.to_string())),
    }
}

#[cfg(test)]
pub(crate) mod test_ops {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Uppercases its argument; fails on the input `"boom"`.
    #[derive(Default)]
    pub struct Shout {
        pub calls: AtomicUsize,
    }

    #[async_trait]
    impl CacheOperation for Shout {
        type Input = (String,);
        type Output = String;

        fn name(&self) -> &str {
            "Shout::call"
        }

        async fn call(&self, input: Self::Input) -> Result<Self::Output> {
            let (text,) = input;
            self.calls.fetch_add(1, Ordering::SeqCst);
            if text == "boom" {
                return Err(CacheError::StoreUnavailable("boom".to_string()));
            }
            Ok(text.to_uppercase())
        }
    }
}
