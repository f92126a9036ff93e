//! Foundation types for KVR.
//!
//! KVR fronts many independent key-value namespaces behind a single tool
//! surface. This crate holds the vocabulary shared by every other KVR crate.
//!
//! # Key Types
//!
//! - [`Namespace`] -- a human-readable name bound to an opaque [`StoreId`]
//! - [`Category`] -- the closed set of namespace groupings
//! - [`Entry`] -- a stored value plus optional structured [`Metadata`]
//! - [`KeyPage`] / [`ListOptions`] -- one page of a cursor-driven key listing
//! - [`ClassificationMapping`] -- a classification key and the namespace that owns it

pub mod classification;
pub mod entry;
pub mod error;
pub mod namespace;
pub mod page;

pub use classification::ClassificationMapping;
pub use entry::{Entry, Metadata};
pub use error::TypeError;
pub use namespace::{Category, Namespace, StoreId};
pub use page::{KeyPage, ListOptions, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
