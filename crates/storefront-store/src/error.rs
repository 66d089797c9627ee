use storefront_types::DocumentId;

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No usable database connection.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Lookup by id found nothing.
    #[error("document {id} not found in {collection}")]
    NotFound {
        collection: String,
        id: DocumentId,
    },

    /// The document cannot be stored as given.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// The collection name is not usable by the backend.
    #[error("invalid collection name: {0:?}")]
    InvalidCollection(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted document could not be decoded.
    #[error("corrupt document in {collection} at line {line}: {reason}")]
    CorruptDocument {
        collection: String,
        line: usize,
        reason: String,
    },
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl StoreError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
