use async_trait::async_trait;
use serde_json::{Map, Value};
use storefront_types::DocumentId;

use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use crate::filter::Filter;

/// Collection-parameterized document store.
///
/// All implementations must satisfy these invariants:
/// - Every insert assigns a fresh id that is never handed out again.
/// - Documents are persisted verbatim; the store only adds the id.
/// - Single-document reads and writes are atomic. Nothing spanning several
///   calls is.
/// - Once the store is unavailable, every call fails with
///   [`StoreError::Unavailable`] without partially executing.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for diagnostics (`"memory"`, `"file"`).
    fn backend(&self) -> &'static str;

    /// Check that the store is reachable, independent of any collection.
    async fn ping(&self) -> StoreResult<()>;

    /// Persist `fields` in `collection` and return the assigned id.
    async fn insert(&self, collection: &str, fields: Map<String, Value>)
        -> StoreResult<DocumentId>;

    /// Persist a batch of documents in one write and return their ids in
    /// input order.
    async fn insert_many(
        &self,
        collection: &str,
        batch: Vec<Map<String, Value>>,
    ) -> StoreResult<Vec<DocumentId>>;

    /// Return at most `limit` documents of `collection` matching `filter`.
    ///
    /// An unknown collection or no matches yields an empty vector.
    async fn query(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> StoreResult<Vec<Document>>;

    /// Look up one document by id. `Ok(None)` if it does not exist.
    async fn find_by_id(&self, collection: &str, id: &DocumentId)
        -> StoreResult<Option<Document>>;

    /// Number of documents of `collection` matching `filter`.
    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    /// Names of collections holding at least one document.
    async fn list_collections(&self) -> StoreResult<Vec<String>>;

    /// Release the connection. Later calls fail with `Unavailable`.
    async fn close(&self);

    /// Look up one document by id, failing with [`StoreError::NotFound`]
    /// when it does not exist.
    async fn get_by_id(&self, collection: &str, id: &DocumentId) -> StoreResult<Document> {
        self.find_by_id(collection, id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: *id,
            })
    }
}
