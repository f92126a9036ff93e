//! Error types for registry operations.

use thiserror::Error;

/// Errors that can occur while building or querying the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Neither a bound store id nor a registered name matched.
    #[error("unknown namespace {reference:?}; known namespaces: {names}", names = .known.join(", "))]
    UnknownNamespace {
        reference: String,
        known: Vec<String>,
    },

    /// No namespace owns this classification key.
    #[error("no namespace is mapped to classification {0:?}")]
    UnmappedClassification(String),

    /// The namespace name is invalid.
    #[error("invalid namespace name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// The classification key is invalid.
    #[error("invalid classification key {key:?}: {reason}")]
    InvalidClassification { key: String, reason: String },

    /// Two catalog rows share a namespace name.
    #[error("duplicate namespace name: {0}")]
    DuplicateNamespace(String),

    /// Two catalog rows share a store id.
    #[error("store id {store_id} is bound to both {first} and {second}")]
    DuplicateStoreId {
        store_id: String,
        first: String,
        second: String,
    },

    /// A store id equals another namespace's name, so caller input naming
    /// that namespace would resolve to the wrong store.
    #[error("store id {store_id} of {owner} is also the name of namespace {store_id}")]
    StoreIdShadowsName { store_id: String, owner: String },

    /// Two classification rows share a key.
    #[error("duplicate classification key: {0}")]
    DuplicateClassification(String),

    /// A classification row names a namespace the catalog does not define.
    #[error("classification {key:?} targets unknown namespace {namespace:?}")]
    UnknownClassificationTarget { key: String, namespace: String },

    /// The configured bodies namespace is not in the catalog.
    #[error("bodies namespace {0:?} is not defined in the catalog")]
    MissingBodiesNamespace(String),

    /// The catalog file could not be parsed.
    #[error("catalog config error: {0}")]
    Config(String),

    /// I/O error while reading a catalog file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RegistryError {
    /// Returns `true` for errors caused by caller input rather than by
    /// deployment configuration.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownNamespace { .. }
                | Self::UnmappedClassification(_)
                | Self::InvalidClassification { .. }
        )
    }
}

/// Convenience type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
