//! Cache Module
//!
//! Typed key-value caching over the shared store: tagged primitive values,
//! generated keys, lenient numeric decoders and an instrumented `store`.

mod typed;
mod value;


// Re-export public types
pub use typed::{StoreOperation, TypedCache, STORE_OPERATION};
pub use value::{decode_float_lenient, decode_integer_lenient, CacheKey, StoredValue};
