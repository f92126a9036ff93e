use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use kvr_store::{InMemoryKvStore, KvStore};
use kvr_types::StoreId;

use crate::catalog::Catalog;

/// Store handles keyed by store id.
///
/// Bindings are supplied by the deployment. A store id may be bound without
/// a catalog entry; such a store is still reachable by its raw id.
#[derive(Clone, Default)]
pub struct StoreBindings {
    stores: HashMap<StoreId, Arc<dyn KvStore>>,
}

impl StoreBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `store` under `store_id`, replacing any previous binding.
    pub fn bind(&mut self, store_id: StoreId, store: Arc<dyn KvStore>) {
        self.stores.insert(store_id, store);
    }

    /// Builder form of [`Self::bind`].
    pub fn with(mut self, store_id: StoreId, store: Arc<dyn KvStore>) -> Self {
        self.bind(store_id, store);
        self
    }

    pub fn get(&self, store_id: &str) -> Option<&Arc<dyn KvStore>> {
        self.stores.get(store_id)
    }

    pub fn contains(&self, store_id: &str) -> bool {
        self.stores.contains_key(store_id)
    }

    /// A fresh, empty in-memory store for every namespace in `catalog`.
    pub fn in_memory(catalog: &Catalog) -> Self {
        let stores = catalog
            .namespaces()
            .map(|ns| {
                let store: Arc<dyn KvStore> = Arc::new(InMemoryKvStore::new(ns.name.clone()));
                (ns.store_id.clone(), store)
            })
            .collect();
        Self { stores }
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

impl fmt::Debug for StoreBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.stores.keys().map(StoreId::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("StoreBindings").field("store_ids", &ids).finish()
    }
}
