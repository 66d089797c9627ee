use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value};
use storefront_types::{DocumentId, IdGenerator};
use tokio::sync::RwLock;

use crate::document::{check_fields, Document};
use crate::error::{StoreError, StoreResult};
use crate::filter::Filter;
use crate::traits::DocumentStore;

#[derive(Default)]
struct CollectionData {
    docs: Vec<Document>,
    index: HashMap<DocumentId, usize>,
}

impl CollectionData {
    fn push(&mut self, doc: Document, id: DocumentId) {
        self.index.insert(id, self.docs.len());
        self.docs.push(doc);
    }
}

/// In-memory, HashMap-based document store.
///
/// Intended for tests and demos. Collections live behind one `RwLock`, so
/// every single call is atomic. Documents are cloned on read.
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, CollectionData>>,
    ids: IdGenerator,
    open: AtomicBool,
}

impl InMemoryDocumentStore {
    /// Create a new empty, open store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            ids: IdGenerator::new(),
            open: AtomicBool::new(true),
        }
    }

    /// Total documents across all collections.
    pub async fn len(&self) -> usize {
        self.collections
            .read()
            .await
            .values()
            .map(|c| c.docs.len())
            .sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.open.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("in-memory store is closed".into()))
        }
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        self.ensure_open()
    }

    async fn insert(
        &self,
        collection: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<DocumentId> {
        self.ensure_open()?;
        check_fields(&fields)?;
        let mut map = self.collections.write().await;
        // close() may have landed while waiting for the lock.
        self.ensure_open()?;
        let id = self.ids.next_id();
        map.entry(collection.to_string())
            .or_default()
            .push(Document::with_id(id, fields), id);
        tracing::debug!(collection, %id, "inserted document");
        Ok(id)
    }

    async fn insert_many(
        &self,
        collection: &str,
        batch: Vec<Map<String, Value>>,
    ) -> StoreResult<Vec<DocumentId>> {
        self.ensure_open()?;
        for fields in &batch {
            check_fields(fields)?;
        }
        if batch.is_empty() {
            return Ok(Vec::new());
        }
        let mut map = self.collections.write().await;
        self.ensure_open()?;
        let data = map.entry(collection.to_string()).or_default();
        let ids: Vec<DocumentId> = batch
            .into_iter()
            .map(|fields| {
                let id = self.ids.next_id();
                data.push(Document::with_id(id, fields), id);
                id
            })
            .collect();
        tracing::debug!(collection, count = ids.len(), "inserted batch");
        Ok(ids)
    }

    async fn query(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> StoreResult<Vec<Document>> {
        self.ensure_open()?;
        let map = self.collections.read().await;
        Ok(map
            .get(collection)
            .map(|data| {
                data.docs
                    .iter()
                    .filter(|doc| doc.matches(filter))
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> StoreResult<Option<Document>> {
        self.ensure_open()?;
        let map = self.collections.read().await;
        Ok(map
            .get(collection)
            .and_then(|data| data.index.get(id).map(|&pos| data.docs[pos].clone())))
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        self.ensure_open()?;
        let map = self.collections.read().await;
        Ok(map
            .get(collection)
            .map(|data| data.docs.iter().filter(|doc| doc.matches(filter)).count() as u64)
            .unwrap_or(0))
    }

    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        self.ensure_open()?;
        let map = self.collections.read().await;
        let mut names: Vec<String> = map
            .iter()
            .filter(|(_, data)| !data.docs.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn close(&self) {
        self.open.store(false, Ordering::Release);
        tracing::debug!("in-memory store closed");
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDocumentStore")
            .field("open", &self.open.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
