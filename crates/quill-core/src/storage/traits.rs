//! Storage trait definition.
//!
//! The `KeyValueStore` trait defines the interface that all persistence
//! backends must implement. Values are opaque JSON blobs; the vault layer
//! owns their shape.

use crate::error::Result;

/// Key-value persistence interface.
///
/// All implementations must ensure:
/// - `load` after a successful `save` returns the saved value
/// - A missing key loads as `Ok(None)`, never as an error
/// - A corrupt or unreadable value under one key does not affect any other
///   key
/// - `remove` of a missing key is a no-op
pub trait KeyValueStore: Send + Sync {
    /// Persist a value under a key, replacing any previous value.
    fn save(&mut self, key: &str, value: &serde_json::Value) -> Result<()>;

    /// Load the value stored under a key, or `None` if absent.
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>>;

    /// Delete the value stored under a key, if any.
    fn remove(&mut self, key: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_definition_compiles() {
        // Ensures the trait definition is valid as a bound
        fn _accepts_store<S: KeyValueStore>(_store: S) {}
    }
}
