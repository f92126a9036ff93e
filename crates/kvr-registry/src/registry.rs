use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use kvr_store::{KvStore, StoreAccessor};
use kvr_types::{Category, Namespace, StoreId};

use crate::bindings::StoreBindings;
use crate::catalog::Catalog;
use crate::error::{RegistryError, Result};
use crate::reference::NamespaceReference;

/// A resolved namespace: the live store plus whatever the catalog knows
/// about it.
#[derive(Clone)]
pub struct StoreHandle {
    /// Catalog entry, absent when the store was reached by a raw id that the
    /// catalog does not list.
    pub namespace: Option<Namespace>,
    pub store_id: StoreId,
    pub store: Arc<dyn KvStore>,
}

impl StoreHandle {
    /// Human-readable name when known, otherwise the raw store id.
    pub fn label(&self) -> &str {
        self.namespace
            .as_ref()
            .map(|ns| ns.name.as_str())
            .unwrap_or_else(|| self.store_id.as_str())
    }

    /// An accessor over this store, labelled for logs and errors.
    pub fn accessor(&self) -> StoreAccessor {
        StoreAccessor::new(self.label(), self.store.clone())
    }
}

impl fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreHandle")
            .field("namespace", &self.namespace)
            .field("store_id", &self.store_id)
            .finish_non_exhaustive()
    }
}

/// Resolves namespace references to live stores.
///
/// Built once from a validated [`Catalog`] and a set of [`StoreBindings`];
/// read-only afterwards and safe to share behind an `Arc`.
#[derive(Debug)]
pub struct NamespaceRegistry {
    catalog: Catalog,
    bindings: StoreBindings,
}

impl NamespaceRegistry {
    pub fn new(catalog: Catalog, bindings: StoreBindings) -> Self {
        for ns in catalog.namespaces() {
            if !bindings.contains(ns.store_id.as_str()) {
                warn!(
                    namespace = %ns.name,
                    store_id = %ns.store_id,
                    "namespace has no store binding and will not resolve"
                );
            }
        }
        Self { catalog, bindings }
    }

    /// A registry over the built-in catalog with an empty in-memory store
    /// behind every namespace.
    pub fn in_memory() -> Self {
        let catalog = Catalog::builtin();
        let bindings = StoreBindings::in_memory(&catalog);
        Self::new(catalog, bindings)
    }

    /// Resolve one interpretation of a reference.
    pub fn resolve(&self, reference: &NamespaceReference) -> Option<StoreHandle> {
        match reference {
            NamespaceReference::StoreId(id) => {
                let store = self.bindings.get(id.as_str())?;
                Some(StoreHandle {
                    namespace: self.catalog.by_store_id(id.as_str()).cloned(),
                    store_id: id.clone(),
                    store: store.clone(),
                })
            }
            NamespaceReference::Name(name) => {
                let ns = self.catalog.get(name)?;
                let store = self.bindings.get(ns.store_id.as_str())?;
                Some(StoreHandle {
                    namespace: Some(ns.clone()),
                    store_id: ns.store_id.clone(),
                    store: store.clone(),
                })
            }
        }
    }

    /// Resolve caller input: first as a bound store id, then as a name.
    pub fn resolve_str(&self, input: &str) -> Result<StoreHandle> {
        let handle = NamespaceReference::candidates(input)
            .iter()
            .find_map(|candidate| self.resolve(candidate));

        match handle {
            Some(handle) => {
                debug!(input, namespace = handle.label(), "resolved namespace");
                Ok(handle)
            }
            None => Err(RegistryError::UnknownNamespace {
                reference: input.to_string(),
                known: self.catalog.names(),
            }),
        }
    }

    /// Handle for a catalog namespace, looked up by its own store id.
    ///
    /// Internal callers that already hold a [`Namespace`] use this rather than
    /// [`Self::resolve_str`], which is for caller input.
    pub fn resolve_namespace(&self, ns: &Namespace) -> Result<StoreHandle> {
        let store = self
            .bindings
            .get(ns.store_id.as_str())
            .ok_or_else(|| RegistryError::UnknownNamespace {
                reference: ns.name.clone(),
                known: self.catalog.names(),
            })?;
        Ok(StoreHandle {
            namespace: Some(ns.clone()),
            store_id: ns.store_id.clone(),
            store: store.clone(),
        })
    }

    /// Handle for the shared bodies namespace.
    pub fn bodies_handle(&self) -> Result<StoreHandle> {
        self.resolve_namespace(self.catalog.bodies())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Catalog metadata for a name, without a store handle.
    pub fn get(&self, name: &str) -> Option<&Namespace> {
        self.catalog.get(name)
    }

    /// All namespaces, sorted by name.
    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.catalog.namespaces()
    }

    pub fn by_category(&self) -> BTreeMap<Category, Vec<String>> {
        self.catalog.by_category()
    }
}
