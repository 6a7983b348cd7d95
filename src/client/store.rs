//! The store abstraction the console dispatches onto.

use crate::error::Result;

/// A key with its current value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Logical operations against a key-value store
///
/// Failures to reach the store are reported as
/// [`ConsoleError::Unavailable`](crate::ConsoleError::Unavailable). Every
/// call is independent: a failed call leaves the store usable.
pub trait KvStore {
    /// Write `value` under `key`, replacing any previous value
    fn put(&mut self, key: &str, value: &str) -> Result<()>;

    /// Current value of `key`, or `None` when it has no entry
    fn get(&mut self, key: &str) -> Result<Option<String>>;

    /// Remove `key`; removing an absent key succeeds
    fn delete(&mut self, key: &str) -> Result<()>;

    /// Every entry whose key starts with `prefix`, ordered by key bytes
    ///
    /// An empty prefix matches every key.
    fn scan_prefix(&mut self, prefix: &str) -> Result<Vec<Entry>>;
}

impl<S: KvStore + ?Sized> KvStore for &mut S {
    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).put(key, value)
    }

    fn get(&mut self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn scan_prefix(&mut self, prefix: &str) -> Result<Vec<Entry>> {
        (**self).scan_prefix(prefix)
    }
}
