//! Store doubles for exercising the layers above [`KvStore`].
//!
//! [`InstrumentedKvStore`] wraps an [`InMemoryKvStore`] with call counters and
//! fault injection. [`EndlessKvStore`] never reports a complete listing.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use kvr_types::{Entry, KeyPage, ListOptions};

use crate::error::{StoreError, StoreResult};
use crate::memory::InMemoryKvStore;
use crate::traits::KvStore;

/// An in-memory store that counts calls and fails on demand.
#[derive(Debug)]
pub struct InstrumentedKvStore {
    inner: InMemoryKvStore,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
    put_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    fail_lists: AtomicBool,
    fail_puts: AtomicBool,
    failing_keys: RwLock<HashSet<String>>,
}

impl InstrumentedKvStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: InMemoryKvStore::new(name),
            list_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
            put_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
            fail_lists: AtomicBool::new(false),
            fail_puts: AtomicBool::new(false),
            failing_keys: RwLock::new(HashSet::new()),
        }
    }

    /// The wrapped store. Calls made directly on it are not counted.
    pub fn inner(&self) -> &InMemoryKvStore {
        &self.inner
    }

    /// Make every `list` call fail.
    pub fn fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    /// Make every `put` call fail.
    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    /// Make reads and writes of one key fail.
    pub fn fail_key(&self, key: impl Into<String>) {
        self.failing_keys
            .write()
            .expect("lock poisoned")
            .insert(key.into());
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.list_calls() + self.get_calls() + self.put_calls() + self.delete_calls()
    }

    fn key_fails(&self, key: &str) -> bool {
        self.failing_keys
            .read()
            .expect("lock poisoned")
            .contains(key)
    }

    fn injected(&self, op: &str) -> StoreError {
        StoreError::unavailable(self.inner.name(), format!("injected {op} failure"))
    }
}

#[async_trait]
impl KvStore for InstrumentedKvStore {
    async fn list(&self, options: &ListOptions) -> StoreResult<KeyPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(self.injected("list"));
        }
        self.inner.list(options).await
    }

    async fn get(&self, key: &str) -> StoreResult<Option<Entry>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.key_fails(key) {
            return Err(self.injected("get"));
        }
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, entry: Entry) -> StoreResult<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_puts.load(Ordering::SeqCst) || self.key_fails(key) {
            return Err(self.injected("put"));
        }
        self.inner.put(key, entry).await
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.key_fails(key) {
            return Err(self.injected("delete"));
        }
        self.inner.delete(key).await
    }
}

/// A store whose listings never complete.
#[derive(Debug, Default)]
pub struct EndlessKvStore {
    pages: AtomicUsize,
}

#[async_trait]
impl KvStore for EndlessKvStore {
    async fn list(&self, _options: &ListOptions) -> StoreResult<KeyPage> {
        let n = self.pages.fetch_add(1, Ordering::SeqCst);
        Ok(KeyPage::partial(vec![format!("k{n}")], format!("page-{n}")))
    }

    async fn get(&self, _key: &str) -> StoreResult<Option<Entry>> {
        Ok(None)
    }

    async fn put(&self, _key: &str, _entry: Entry) -> StoreResult<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> StoreResult<bool> {
        Ok(false)
    }
}
