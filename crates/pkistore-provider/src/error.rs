use pkistore_pki::ObjectError;
use thiserror::Error;

/// Errors from provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The backend partition could not be opened.
    #[error("cannot open store category {category:?}: {reason}")]
    StoreOpenFailed { category: String, reason: String },

    /// A backend object failed to decode or encode.
    #[error(transparent)]
    Object(#[from] ObjectError),

    /// No object with this content hash exists in the category.
    #[error("no object {hash} in category {category:?}")]
    NotFound { hash: String, category: String },

    /// I/O error from a file-backed store.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The file store descriptor is malformed.
    #[error("descriptor error: {0}")]
    Descriptor(String),
}

/// Result alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
