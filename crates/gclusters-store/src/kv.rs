//! Key-value store abstraction.

use gclusters_types::error::Result;

/// String key-value storage.
///
/// Implementations use interior mutability so a store can be shared behind
/// an `Arc` by every component that persists state.
pub trait KvStore: Send + Sync {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Whether `key` holds a value.
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}
