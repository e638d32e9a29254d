//! Store Entry Module
//!
//! Defines the structure for individual keyspace entries with TTL support.

use chrono::Utc;

// == Entry Value ==
/// The two kinds of value a key can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryValue {
    /// Plain byte string (SET / GET / INCR)
    Bytes(Vec<u8>),
    /// List of byte strings (RPUSH / LRANGE / LLEN)
    List(Vec<Vec<u8>>),
}

impl EntryValue {
    /// Name of the kind, as reported in type errors.
    pub fn kind(&self) -> &'static str {
        match self {
            EntryValue::Bytes(_) => "string",
            EntryValue::List(_) => "list",
        }
    }
}

// == Store Entry ==
/// Represents a single keyspace entry with value and metadata.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    /// The stored value
    pub value: EntryValue,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<i64>,
}

impl StoreEntry {
    // == Constructor ==
    /// Creates a new entry with optional TTL.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_seconds` - Optional TTL in seconds
    pub fn new(value: EntryValue, ttl_seconds: Option<u64>) -> Self {
        let expires_at = ttl_seconds.map(|ttl| {
            let ttl_ms = i64::try_from(ttl).unwrap_or(i64::MAX).saturating_mul(1000);
            current_timestamp_ms().saturating_add(ttl_ms)
        });

        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    fn bytes(s: &str) -> EntryValue {
        EntryValue::Bytes(s.as_bytes().to_vec())
    }

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = StoreEntry::new(bytes("test_value"), None);

        assert_eq!(entry.value, bytes("test_value"));
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = StoreEntry::new(bytes("test_value"), Some(60));

        assert!(entry.expires_at.is_some());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = StoreEntry::new(bytes("test_value"), Some(1));

        assert!(!entry.is_expired());

        // Wait for expiration
        sleep(Duration::from_millis(1100));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = current_timestamp_ms();
        let entry = StoreEntry {
            value: bytes("test"),
            expires_at: Some(now), // Expires exactly now
        };

        assert!(entry.is_expired(), "Entry should be expired at boundary");
    }

    #[test]
    fn test_entry_kind() {
        assert_eq!(bytes("x").kind(), "string");
        assert_eq!(EntryValue::List(vec![]).kind(), "list");
    }
}
