//! Replay Module
//!
//! Rebuilds the call log of an instrumented operation from its history lists.
//!
//! ```text
//! TypedCache::store was called 3 times:
//! TypedCache::store(*["foo"]) -> "13bf32a9-5d24-4f9b-9d0c-bd5b5f2a8a1e"
//! TypedCache::store(*[42]) -> "dcddd00c-4219-4d5e-b1a8-6aa6bb3a3f23"
//! TypedCache::store(*[[98,97,114]]) -> "5e752a33-8a0b-4a23-b0a4-1de2f8c1c1f8"
//! ```

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::instrument::history_keys;
use crate::store::SharedStore;

// == Call Record ==
/// One recorded call: rendered arguments and rendered result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRecord {
    pub input: String,
    pub output: String,
}

// == Replay Log ==
/// Ordered call history of one operation.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayLog {
    name: String,
    total_calls: usize,
    entries: Vec<CallRecord>,
}

impl ReplayLog {
    /// Qualified operation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of recorded inputs, failed calls included.
    pub fn total_calls(&self) -> usize {
        self.total_calls
    }

    /// Paired records in call order. Shorter than `total_calls` when some
    /// calls failed before producing an output.
    pub fn entries(&self) -> &[CallRecord] {
        &self.entries
    }

    /// Header line followed by one line per paired record.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.entries.len() + 1);
        lines.push(format!("{} was called {} times:", self.name, self.total_calls));
        lines.extend(
            self.entries
                .iter()
                .map(|record| format!("{}(*{}) -> {}", self.name, record.input, record.output)),
        );
        lines
    }
}

impl fmt::Display for ReplayLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

// == Replayer ==
/// Reads call history from the store, independently of live calls.
pub struct Replayer {
    store: SharedStore,
}

impl Replayer {
    /// Creates a replayer reading from `store`.
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Loads the history of `name`.
    ///
    /// Fails with [`CacheError::NoHistory`] when either list is empty.
    /// Inputs and outputs are paired by position up to the shorter list.
    /// A failed call records an input but no output, so once a call has
    /// failed every later output is shown next to an earlier call's input.
    pub async fn replay(&self, name: &str) -> Result<ReplayLog> {
        let (inputs_key, outputs_key) = history_keys(name);
        let inputs = self.store.lrange(&inputs_key, 0, -1).await?;
        let outputs = self.store.lrange(&outputs_key, 0, -1).await?;

        if inputs.is_empty() || outputs.is_empty() {
            return Err(CacheError::NoHistory(name.to_string()));
        }
        if inputs.len() != outputs.len() {
            debug!(
                operation = name,
                inputs = inputs.len(),
                outputs = outputs.len(),
                "history lists differ in length, pairing up to the shorter"
            );
        }

        let total_calls = inputs.len();
        let entries = inputs
            .into_iter()
            .zip(outputs)
            .map(|(input, output)| CallRecord {
                input: String::from_utf8_lossy(&input).into_owned(),
                output: String::from_utf8_lossy(&output).into_owned(),
            })
            .collect();

        Ok(ReplayLog {
            name: name.to_string(),
            total_calls,
            entries,
        })
    }

    /// Loads the history of `name` and prints it to stdout.
    pub async fn print(&self, name: &str) -> Result<ReplayLog> {
        let log = self.replay(name).await?;
        println!("{log}");
        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{TypedCache, STORE_OPERATION};
    use crate::store::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_replay_without_history() {
        let replayer = Replayer::new(Arc::new(MemoryStore::new()));

        let result = replayer.replay(STORE_OPERATION).await;
        assert!(matches!(result, Err(CacheError::NoHistory(name)) if name == STORE_OPERATION));
    }

    #[tokio::test]
    async fn test_replay_three_stores_in_order() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let cache = TypedCache::new(store.clone()).await.unwrap();
        let keys = [
            cache.store("a").await.unwrap(),
            cache.store("b").await.unwrap(),
            cache.store("c").await.unwrap(),
        ];

        let log = Replayer::new(store).replay(STORE_OPERATION).await.unwrap();
        assert_eq!(log.total_calls(), 3);
        assert_eq!(
            log.lines(),
            vec![
                "TypedCache::store was called 3 times:".to_string(),
                format!("TypedCache::store(*[\"a\"]) -> \"{}\"", keys[0]),
                format!("TypedCache::store(*[\"b\"]) -> \"{}\"", keys[1]),
                format!("TypedCache::store(*[\"c\"]) -> \"{}\"", keys[2]),
            ]
        );
    }

    #[tokio::test]
    async fn test_replay_unequal_lengths_pairs_shorter() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        store.rpush("op:inputs", b"[1]").await.unwrap();
        store.rpush("op:inputs", b"[2]").await.unwrap();
        store.rpush("op:outputs", b"\"one\"").await.unwrap();

        let log = Replayer::new(store).replay("op").await.unwrap();
        assert_eq!(log.total_calls(), 2);
        assert_eq!(
            log.entries(),
            &[CallRecord {
                input: "[1]".to_string(),
                output: "\"one\"".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_replay_inputs_without_outputs() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        store.rpush("op:inputs", b"[1]").await.unwrap();

        let result = Replayer::new(store).replay("op").await;
        assert!(matches!(result, Err(CacheError::NoHistory(_))));
    }

    #[tokio::test]
    async fn test_display_matches_lines() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        store.rpush("op:inputs", b"[1]").await.unwrap();
        store.rpush("op:outputs", b"2").await.unwrap();

        let log = Replayer::new(store).print("op").await.unwrap();
        assert_eq!(log.to_string(), "op was called 1 times:\nop(*[1]) -> 2");
        assert_eq!(log.name(), "op");
    }
}
