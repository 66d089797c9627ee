use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::TypeResult;

/// A document type bound to the collection that stores it.
///
/// Typed collections use this instead of passing collection names around
/// as free-form strings.
pub trait Schema: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Name of the collection documents of this type live in.
    const COLLECTION: &'static str;

    /// Schema-level payload checks, run before a document is written.
    fn validate(&self) -> TypeResult<()> {
        Ok(())
    }
}
