/// Errors from key-value store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store could not serve the request.
    #[error("store {store} unavailable: {reason}")]
    Unavailable { store: String, reason: String },

    /// The cursor was not issued by this store for this listing.
    #[error("invalid cursor: {0}")]
    InvalidCursor(String),

    /// A bulk read asked for more keys than the batch cap allows.
    #[error("too many keys: {requested} requested, maximum is {max}")]
    TooManyKeys { requested: usize, max: usize },

    /// A listing did not complete within the page cap.
    #[error("pagination exhausted after {pages} pages without completion")]
    PaginationExhausted { pages: usize },
}

impl StoreError {
    /// Shorthand for [`StoreError::Unavailable`].
    pub fn unavailable(store: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            store: store.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
