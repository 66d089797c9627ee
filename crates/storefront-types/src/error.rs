use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    /// The string is not shaped like a native document identifier.
    #[error("malformed identifier {input:?}: {reason}")]
    MalformedIdentifier { input: String, reason: String },

    /// A payload failed schema-level validation.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Result alias for type operations.
pub type TypeResult<T> = Result<T, TypeError>;
