use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::RwLock;

use async_trait::async_trait;
use kvr_types::{Entry, KeyPage, ListOptions, MAX_LIST_LIMIT};

use crate::error::{StoreError, StoreResult};
use crate::traits::KvStore;

/// In-memory, `BTreeMap`-based key-value store.
///
/// Intended for tests and local serving. Keys are kept sorted so listings
/// are stable, and cursors encode the listing prefix together with the last
/// key returned. A cursor presented with a different prefix is rejected.
pub struct InMemoryKvStore {
    name: String,
    entries: RwLock<BTreeMap<String, Entry>>,
}

impl InMemoryKvStore {
    /// Create a new empty store. `name` is only used in errors and `Debug`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }

    /// Remove all entries from the store.
    pub fn clear(&self) {
        self.entries.write().expect("lock poisoned").clear();
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.entries
            .read()
            .expect("lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    fn decode_cursor(&self, cursor: &str, prefix: &str) -> StoreResult<String> {
        let bytes = hex::decode(cursor)
            .map_err(|e| StoreError::InvalidCursor(format!("not issued by {}: {e}", self.name)))?;
        let raw = String::from_utf8(bytes)
            .map_err(|_| StoreError::InvalidCursor(format!("not issued by {}", self.name)))?;
        let (issued_prefix, last_key) = raw
            .split_once('\0')
            .ok_or_else(|| StoreError::InvalidCursor(format!("not issued by {}", self.name)))?;
        if issued_prefix != prefix {
            return Err(StoreError::InvalidCursor(format!(
                "cursor was issued for prefix {issued_prefix:?}, not {prefix:?}"
            )));
        }
        Ok(last_key.to_string())
    }
}

fn encode_cursor(prefix: &str, last_key: &str) -> String {
    hex::encode(format!("{prefix}\0{last_key}"))
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new("memory")
    }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn list(&self, options: &ListOptions) -> StoreResult<KeyPage> {
        let prefix = options.prefix.as_deref().unwrap_or("");
        let limit = options.limit.clamp(1, MAX_LIST_LIMIT);
        let after = options
            .cursor
            .as_deref()
            .map(|c| self.decode_cursor(c, prefix))
            .transpose()?;

        let start = match after {
            Some(last) => Bound::Excluded(last),
            None => Bound::Included(prefix.to_string()),
        };

        let mut keys: Vec<String> = {
            let map = self.entries.read().expect("lock poisoned");
            map.range((start, Bound::<String>::Unbounded))
                .map(|(k, _)| k)
                .take_while(|k| k.starts_with(prefix))
                .take(limit + 1)
                .cloned()
                .collect()
        };

        if keys.len() > limit {
            keys.truncate(limit);
            let cursor = keys
                .last()
                .map(|last| encode_cursor(prefix, last))
                .unwrap_or_default();
            Ok(KeyPage::partial(keys, cursor))
        } else {
            Ok(KeyPage::last(keys))
        }
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Entry>> {
        let map = self.entries.read().expect("lock poisoned");
        Ok(map.get(key).cloned())
    }

    async fn put(&self, key: &str, entry: Entry) -> StoreResult<()> {
        let mut map = self.entries.write().expect("lock poisoned");
        map.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut map = self.entries.write().expect("lock poisoned");
        Ok(map.remove(key).is_some())
    }
}

impl std::fmt::Debug for InMemoryKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKvStore")
            .field("name", &self.name)
            .field("entry_count", &self.len())
            .finish()
    }
}
