use pkistore_pki::ObjectError;
use pkistore_provider::ProviderError;
use pkistore_types::TypeError;
use thiserror::Error;

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The named provider is not attached to the store.
    #[error("provider not found: {0}")]
    ProviderNotFound(String),

    /// A provider with this type string is already attached.
    #[error("provider already attached: {0}")]
    DuplicateProviderType(String),

    /// No catalog row matched the query.
    #[error("no matching item")]
    NotFound,

    /// The configuration payload is malformed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A provider operation failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A domain-object operation failed.
    #[error(transparent)]
    Object(#[from] ObjectError),

    /// A filter or identity value was malformed.
    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Result alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
