use storefront_store::StoreError;
use storefront_types::TypeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// An order line names a product id that is malformed or resolves to
    /// nothing. Carries the id exactly as submitted.
    #[error("invalid product ID: {0}")]
    InvalidReference(String),

    /// An id string is not shaped like a document id.
    #[error("malformed identifier: {0}")]
    MalformedIdentifier(String),

    /// The payload failed schema validation.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<TypeError> for CatalogError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::MalformedIdentifier { input, .. } => Self::MalformedIdentifier(input),
            TypeError::Validation(msg) => Self::Validation(msg),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
