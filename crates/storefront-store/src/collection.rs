use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use storefront_types::{DocumentId, Schema};

use crate::document::Document;
use crate::error::StoreResult;
use crate::filter::Filter;
use crate::traits::DocumentStore;

/// Typed handle on the collection that stores `S`.
///
/// The collection name comes from [`Schema::COLLECTION`], so callers never
/// spell it out.
pub struct Collection<S> {
    store: Arc<dyn DocumentStore>,
    _schema: PhantomData<fn() -> S>,
}

impl<S: Schema> Collection<S> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _schema: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        S::COLLECTION
    }

    /// Store one value.
    pub async fn insert(&self, value: &S) -> StoreResult<DocumentId> {
        let fields = Document::fields_of(value)?;
        self.store.insert(S::COLLECTION, fields).await
    }

    /// Store all values as one batch.
    pub async fn insert_many(&self, values: &[S]) -> StoreResult<Vec<DocumentId>> {
        let batch = values
            .iter()
            .map(Document::fields_of::<S>)
            .collect::<StoreResult<Vec<_>>>()?;
        self.store.insert_many(S::COLLECTION, batch).await
    }

    pub async fn find(&self, filter: &Filter, limit: usize) -> StoreResult<Vec<Document>> {
        self.store.query(S::COLLECTION, filter, limit).await
    }

    pub async fn find_by_id(&self, id: &DocumentId) -> StoreResult<Option<Document>> {
        self.store.find_by_id(S::COLLECTION, id).await
    }

    /// Raw document by id, or [`StoreError::NotFound`](crate::StoreError::NotFound).
    pub async fn get(&self, id: &DocumentId) -> StoreResult<Document> {
        self.store.get_by_id(S::COLLECTION, id).await
    }

    /// Decoded value by id.
    pub async fn get_typed(&self, id: &DocumentId) -> StoreResult<S> {
        self.get(id).await?.decode()
    }

    pub async fn count(&self, filter: &Filter) -> StoreResult<u64> {
        self.store.count(S::COLLECTION, filter).await
    }

    pub async fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.count(&Filter::all()).await? == 0)
    }
}

impl<S> Clone for Collection<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _schema: PhantomData,
        }
    }
}

impl<S: Schema> fmt::Debug for Collection<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("name", &S::COLLECTION)
            .field("backend", &self.store.backend())
            .finish()
    }
}
