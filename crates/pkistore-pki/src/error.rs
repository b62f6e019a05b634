use pkistore_types::PkiItemKind;
use thiserror::Error;

/// Errors from domain-object decode/encode operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ObjectError {
    /// A null/absent object was given where content was required.
    #[error("empty pki object")]
    EmptyObject,

    /// The bytes do not parse as the expected object kind.
    #[error("decode failed: {0}")]
    DecodeFailed(String),

    /// The object could not be serialized to the requested form.
    #[error("encode failed: {0}")]
    EncodeFailed(String),

    /// The decoded object is of a different kind than requested.
    #[error("unexpected object kind: expected {expected}, got {actual}")]
    UnexpectedKind {
        expected: PkiItemKind,
        actual: PkiItemKind,
    },
}

/// Result alias for domain-object operations.
pub type ObjectResult<T> = Result<T, ObjectError>;
