//! Per-namespace key-value storage for KVR.
//!
//! Every namespace KVR fronts is reached through the [`KvStore`] trait: a
//! cursor-paginated listing plus point get, put-with-metadata, and delete.
//! The store itself (persistence, replication, consistency) belongs to the
//! deployment; this crate only fixes the interface and how KVR drives it.
//!
//! # Storage Backends
//!
//! - [`InMemoryKvStore`] -- `BTreeMap`-based store for tests and local serving
//!
//! # Accessor
//!
//! [`StoreAccessor`] wraps one resolved store handle and layers the
//! multi-call operations on top of the trait: exhausting pagination
//! ([`StoreAccessor::list_all`]) and concurrent bulk reads
//! ([`StoreAccessor::get_many`]).
//!
//! # Design Rules
//!
//! 1. A missing key is `Ok(None)`, never an error.
//! 2. Deleting an absent key succeeds.
//! 3. Cursors are opaque and only valid for the store and prefix that issued them.
//! 4. Bulk reads isolate per-key failures; single reads surface them.
//! 5. Pagination is bounded: a store that never completes is an error, not a hang.

pub mod accessor;
pub mod error;
pub mod memory;
pub mod testing;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use accessor::{BulkValue, StoreAccessor, MAX_BULK_KEYS, MAX_LIST_PAGES};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryKvStore;
pub use traits::KvStore;
