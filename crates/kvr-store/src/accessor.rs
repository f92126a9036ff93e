use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use kvr_types::{Entry, KeyPage, ListOptions, Metadata, DEFAULT_LIST_LIMIT};

use crate::error::{StoreError, StoreResult};
use crate::traits::KvStore;

/// Upper bound on list calls made by [`StoreAccessor::list_all`].
pub const MAX_LIST_PAGES: usize = 10_000;

/// Default batch cap for [`StoreAccessor::get_many`].
pub const MAX_BULK_KEYS: usize = 100;

/// Per-key outcome of a bulk read.
///
/// Serializes as the value string, `null` for an absent key, or
/// `{"error": "..."}` when that key's read failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BulkValue {
    Value(String),
    Failed { error: String },
    Missing,
}

impl BulkValue {
    pub fn as_value(&self) -> Option<&str> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Uniform operations against one resolved store handle.
///
/// Cheap to clone; the handle is shared.
#[derive(Clone)]
pub struct StoreAccessor {
    label: String,
    store: Arc<dyn KvStore>,
}

impl StoreAccessor {
    /// Wrap a store handle. `label` names the namespace in logs and errors.
    pub fn new(label: impl Into<String>, store: Arc<dyn KvStore>) -> Self {
        Self {
            label: label.into(),
            store,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The underlying store handle.
    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    /// Fetch one page of keys. `limit` defaults to 1000 and is clamped to the
    /// store maximum.
    pub async fn list_page(
        &self,
        prefix: Option<&str>,
        cursor: Option<&str>,
        limit: Option<usize>,
    ) -> StoreResult<KeyPage> {
        let options = ListOptions::new()
            .prefix(prefix)
            .cursor(cursor)
            .limit(limit.unwrap_or(DEFAULT_LIST_LIMIT));
        let page = self.store.list(&options).await?;
        debug!(
            namespace = %self.label,
            keys = page.keys.len(),
            complete = page.complete,
            "listed page"
        );
        Ok(page)
    }

    /// Enumerate every key matching `prefix` by following cursors until the
    /// store reports completion.
    pub async fn list_all(&self, prefix: Option<&str>) -> StoreResult<Vec<String>> {
        self.list_all_paged(prefix, DEFAULT_LIST_LIMIT, MAX_LIST_PAGES)
            .await
    }

    /// [`Self::list_all`] with an explicit page size and page cap.
    pub async fn list_all_paged(
        &self,
        prefix: Option<&str>,
        page_size: usize,
        max_pages: usize,
    ) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut cursor: Option<String> = None;

        for pages in 1..=max_pages {
            let page = self
                .list_page(prefix, cursor.as_deref(), Some(page_size))
                .await?;
            keys.extend(page.keys);

            if page.complete {
                debug!(namespace = %self.label, pages, total = keys.len(), "listing complete");
                return Ok(keys);
            }
            match page.cursor {
                Some(next) => cursor = Some(next),
                // Incomplete without a way forward: retrying would loop on page one.
                None => return Err(StoreError::PaginationExhausted { pages }),
            }
        }

        warn!(namespace = %self.label, max_pages, "listing never reported completion");
        Err(StoreError::PaginationExhausted { pages: max_pages })
    }

    /// Exact number of keys matching `prefix`. O(keys).
    pub async fn count(&self, prefix: Option<&str>) -> StoreResult<usize> {
        Ok(self.list_all(prefix).await?.len())
    }

    /// Read a value. `None` means the key is absent.
    pub async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.get_entry(key).await?.map(|entry| entry.value))
    }

    /// Read a value together with its metadata.
    pub async fn get_entry(&self, key: &str) -> StoreResult<Option<Entry>> {
        self.store.get(key).await
    }

    /// Read up to `max` keys concurrently.
    ///
    /// The result holds one slot per distinct requested key. A failed read is
    /// recorded in its own slot and never fails the batch. Requests over the
    /// cap are rejected before any store call.
    pub async fn get_many(
        &self,
        keys: &[String],
        max: usize,
    ) -> StoreResult<BTreeMap<String, BulkValue>> {
        if keys.len() > max {
            return Err(StoreError::TooManyKeys {
                requested: keys.len(),
                max,
            });
        }

        let distinct: BTreeSet<&str> = keys.iter().map(String::as_str).collect();
        let reads = distinct.into_iter().map(|key| async move {
            let outcome = match self.store.get(key).await {
                Ok(Some(entry)) => BulkValue::Value(entry.value),
                Ok(None) => BulkValue::Missing,
                Err(e) => {
                    warn!(namespace = %self.label, key, error = %e, "bulk read failed for key");
                    BulkValue::Failed {
                        error: e.to_string(),
                    }
                }
            };
            (key.to_string(), outcome)
        });

        let results: BTreeMap<String, BulkValue> = join_all(reads).await.into_iter().collect();
        debug!(namespace = %self.label, keys = results.len(), "bulk read complete");
        Ok(results)
    }

    /// Create or replace `key`.
    pub async fn put(&self, key: &str, value: &str, metadata: Option<Metadata>) -> StoreResult<()> {
        let entry = match metadata {
            Some(meta) => Entry::with_metadata(value, meta),
            None => Entry::new(value),
        };
        self.store.put(key, entry).await?;
        debug!(namespace = %self.label, key, "stored entry");
        Ok(())
    }

    /// Delete `key`. Returns whether it existed; absent keys succeed.
    pub async fn delete(&self, key: &str) -> StoreResult<bool> {
        let existed = self.store.delete(key).await?;
        debug!(namespace = %self.label, key, existed, "deleted entry");
        Ok(existed)
    }
}

impl fmt::Debug for StoreAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreAccessor")
            .field("label", &self.label)
            .finish()
    }
}
