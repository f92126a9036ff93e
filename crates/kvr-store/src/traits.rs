use async_trait::async_trait;
use kvr_types::{Entry, KeyPage, ListOptions};

use crate::error::StoreResult;

/// One key-value namespace.
///
/// All implementations must satisfy these invariants:
/// - Keys are unique within the store; nothing is implied across stores.
/// - `list` pages are disjoint and, followed cursor to cursor, cover every
///   matching key exactly once.
/// - A page is `complete` exactly when it carries no cursor.
/// - `get` of an absent key is `Ok(None)`.
/// - Every call may suspend; implementations must not block the runtime.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Return one page of keys matching `options.prefix`, resuming after
    /// `options.cursor` when present.
    async fn list(&self, options: &ListOptions) -> StoreResult<KeyPage>;

    /// Read the entry stored under `key`.
    async fn get(&self, key: &str) -> StoreResult<Option<Entry>>;

    /// Create or replace the entry stored under `key`.
    async fn put(&self, key: &str, entry: Entry) -> StoreResult<()>;

    /// Delete `key`. Returns `true` if the key existed.
    ///
    /// Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> StoreResult<bool>;
}
