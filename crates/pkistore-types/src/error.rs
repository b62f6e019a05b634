use thiserror::Error;

/// Errors produced by type-level operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    /// A character outside `0-9A-Fa-f` was given to the hex decoder.
    #[error("invalid hex digit: {0:?}")]
    InvalidHexDigit(char),

    /// A filter was built with an attribute name no catalog field matches.
    #[error("invalid filter key: {0}")]
    InvalidFilterKey(String),

    /// An item kind string did not name a known kind.
    #[error("unknown item kind: {0}")]
    UnknownKind(String),

    /// An encoding format string did not name a known format.
    #[error("unknown encoding format: {0}")]
    UnknownFormat(String),
}
