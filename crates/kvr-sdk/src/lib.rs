//! High-level SDK for KVR.
//!
//! [`Fleet`] is the single entry point applications embed: it owns the
//! namespace registry and the entity router and exposes every operation the
//! tool surface offers, from single-key reads to split-entity writes and
//! fleet health scans.

pub mod error;
pub mod fleet;
pub mod health;
pub mod split;

pub use error::{SdkError, SdkResult};
pub use fleet::{FolderStats, Fleet, NamespaceOverview};
pub use health::{HealthReport, HealthStatus, UNKNOWN_COUNT};
pub use split::{derive_body_key, SplitReceipt, SplitWrite};

// Re-export key types
pub use kvr_registry::{Catalog, EntityRouter, NamespaceRegistry, StoreBindings};
pub use kvr_store::{BulkValue, KvStore, StoreAccessor};
pub use kvr_types::{Category, ClassificationMapping, Entry, KeyPage, Metadata, Namespace};
