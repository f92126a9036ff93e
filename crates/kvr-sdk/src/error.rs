use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("registry error: {0}")]
    Registry(#[from] kvr_registry::RegistryError),

    #[error("store error: {0}")]
    Store(#[from] kvr_store::StoreError),

    /// The metadata half of a split write landed but the body did not. The
    /// metadata entry references a body that does not exist.
    #[error("body write failed after metadata {metadata_key:?} was stored (body key {body_key:?}): {source}")]
    BodyWriteFailed {
        metadata_key: String,
        body_key: String,
        #[source]
        source: kvr_store::StoreError,
    },
}

impl SdkError {
    /// Returns `true` when the caller's input caused the failure.
    pub fn is_caller_error(&self) -> bool {
        match self {
            Self::Registry(e) => e.is_caller_error(),
            Self::Store(kvr_store::StoreError::TooManyKeys { .. })
            | Self::Store(kvr_store::StoreError::InvalidCursor(_)) => true,
            _ => false,
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
