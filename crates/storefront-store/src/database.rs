use std::path::Path;
use std::sync::Arc;

use storefront_types::Schema;

use crate::collection::Collection;
use crate::error::{StoreError, StoreResult};
use crate::file::FileDocumentStore;
use crate::memory::InMemoryDocumentStore;
use crate::traits::DocumentStore;

const MEMORY_SCHEME: &str = "memory://";
const FILE_SCHEME: &str = "file://";

/// Connection handle to a named database.
///
/// Built once at startup from a URL and shared by reference; closing it
/// makes every collection obtained from it unavailable.
///
/// Supported URLs:
/// - `memory://` -- fresh in-memory store
/// - `file://<dir>` -- file store rooted at `<dir>/<name>`
pub struct Database {
    name: String,
    store: Arc<dyn DocumentStore>,
}

impl Database {
    /// Connect to the database `name` at `url`.
    pub async fn connect(url: &str, name: &str) -> StoreResult<Self> {
        check_name(name)?;
        let store: Arc<dyn DocumentStore> = if url.starts_with(MEMORY_SCHEME) {
            Arc::new(InMemoryDocumentStore::new())
        } else if let Some(root) = url.strip_prefix(FILE_SCHEME) {
            if root.is_empty() {
                return Err(StoreError::Unavailable("file url has no path".into()));
            }
            Arc::new(FileDocumentStore::open(Path::new(root).join(name)).await?)
        } else {
            return Err(StoreError::Unavailable(format!(
                "unsupported database url scheme in {url:?}"
            )));
        };
        tracing::info!(backend = store.backend(), database = name, "database connected");
        Ok(Self::from_store(name, store))
    }

    /// Wrap an existing store.
    pub fn from_store(name: impl Into<String>, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            name: name.into(),
            store,
        }
    }

    /// A fresh in-memory database.
    pub fn in_memory(name: impl Into<String>) -> Self {
        Self::from_store(name, Arc::new(InMemoryDocumentStore::new()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    pub fn store(&self) -> Arc<dyn DocumentStore> {
        Arc::clone(&self.store)
    }

    /// Typed handle on the collection for `S`.
    pub fn collection<S: Schema>(&self) -> Collection<S> {
        Collection::new(self.store())
    }

    pub async fn ping(&self) -> StoreResult<()> {
        self.store.ping().await
    }

    pub async fn list_collections(&self) -> StoreResult<Vec<String>> {
        self.store.list_collections().await
    }

    pub async fn close(&self) {
        self.store.close().await;
        tracing::info!(database = %self.name, "database closed");
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("name", &self.name)
            .field("backend", &self.store.backend())
            .finish()
    }
}

fn check_name(name: &str) -> StoreResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::Unavailable(format!("invalid database name {name:?}")))
    }
}
