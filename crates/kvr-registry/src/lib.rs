//! Namespace registry for KVR.
//!
//! Callers name a namespace either by its human-readable name
//! (`court-of-appeal`) or by the raw store identifier it is bound under
//! (`COURT_OF_APPEAL_KV`). This crate turns either form into a live store
//! handle, and maps classification keys (mail-folder paths) to the namespace
//! that owns entities of that classification.
//!
//! # Architecture
//!
//! - A [`Catalog`] is the validated deployment table: namespaces, their
//!   categories, the classification table, and the shared bodies namespace.
//!   It is built once and never mutated.
//! - [`StoreBindings`] attach a [`kvr_store::KvStore`] to each store id.
//! - [`NamespaceRegistry`] resolves a [`NamespaceReference`] against the
//!   catalog and bindings.
//! - [`EntityRouter`] answers "which namespace owns this classification key".
//!
//! # Modules
//!
//! - [`error`] -- Error types for registry operations
//! - [`names`] -- Namespace name, store id, and classification key validation
//! - [`catalog`] -- The deployment table and its TOML form
//! - [`bindings`] -- Store id to store handle bindings
//! - [`reference`] -- The two ways of naming a namespace
//! - [`registry`] -- Resolution of references to store handles
//! - [`router`] -- Classification key routing

pub mod bindings;
pub mod catalog;
pub mod error;
pub mod names;
pub mod reference;
pub mod registry;
pub mod router;

pub use bindings::StoreBindings;
pub use catalog::{Catalog, CatalogConfig, ClassificationConfig, NamespaceConfig};
pub use error::{RegistryError, Result};
pub use names::{normalize_classification_key, validate_namespace_name, validate_store_id};
pub use reference::NamespaceReference;
pub use registry::{NamespaceRegistry, StoreHandle};
pub use router::EntityRouter;
