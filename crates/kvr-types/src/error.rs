use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown namespace category: {0}")]
    UnknownCategory(String),

    #[error("store id must not be empty")]
    EmptyStoreId,
}
