//! In-process store backed by an ordered map.
//!
//! A supported backend alongside [`Session`](super::Session): anything
//! generic over [`KvStore`] runs against it unchanged, with no server and
//! nothing persisted past the process.

use std::collections::BTreeMap;

use crate::error::Result;
use super::{Entry, KvStore};

/// A [`KvStore`] that keeps everything in memory
///
/// `BTreeMap<String, _>` orders keys by their UTF-8 bytes, which is the
/// same order a remote prefix scan returns.
///
/// ```
/// use atlaskv_console::{Dispatcher, KvStore, MemoryStore};
///
/// let mut dispatcher = Dispatcher::new(MemoryStore::new());
/// let mut out = Vec::new();
/// dispatcher.dispatch_line("set color blue", &mut out).unwrap();
///
/// let mut store = dispatcher.into_store();
/// assert_eq!(store.get("color").unwrap().as_deref(), Some("blue"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn scan_prefix(&mut self, prefix: &str) -> Result<Vec<Entry>> {
        Ok(self
            .entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| Entry::new(key.as_str(), value.as_str()))
            .collect())
    }
}
