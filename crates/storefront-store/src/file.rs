use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value};
use storefront_types::{DocumentId, IdGenerator};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::document::{check_fields, Document};
use crate::error::{StoreError, StoreResult};
use crate::filter::Filter;
use crate::traits::DocumentStore;

const EXTENSION: &str = "jsonl";

/// File-backed document store.
///
/// Each collection is an append-only JSON-lines file `<dir>/<name>.jsonl`,
/// one stored [`Document`] per line. Reads scan the file; writes append
/// under a store-wide mutex so a batch lands as one contiguous write.
///
/// The store counts as unavailable once closed or when its directory has
/// disappeared.
///
/// There is no index: every read, `find_by_id` included, parses the whole
/// collection file. Validating an order of n lines costs n scans.
///
/// A write that fails partway is truncated back to the last complete line.
/// An unterminated trailing line that does not parse is skipped on read and
/// cut off by the next append.
pub struct FileDocumentStore {
    dir: PathBuf,
    ids: IdGenerator,
    open: AtomicBool,
    write_lock: Mutex<()>,
}

impl FileDocumentStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await.map_err(|e| {
            StoreError::Unavailable(format!("cannot open {}: {e}", dir.display()))
        })?;
        tracing::info!(dir = %dir.display(), "opened file document store");
        Ok(Self {
            dir,
            ids: IdGenerator::new(),
            open: AtomicBool::new(true),
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn ensure_open(&self) -> StoreResult<()> {
        if !self.open.load(Ordering::Acquire) {
            return Err(StoreError::Unavailable("file store is closed".into()));
        }
        match fs::metadata(&self.dir).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(StoreError::Unavailable(format!(
                "{} is not a directory",
                self.dir.display()
            ))),
            Err(e) => Err(StoreError::Unavailable(format!(
                "{}: {e}",
                self.dir.display()
            ))),
        }
    }

    fn collection_path(&self, collection: &str) -> StoreResult<PathBuf> {
        let valid = !collection.is_empty()
            && collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidCollection(collection.to_string()));
        }
        Ok(self.dir.join(format!("{collection}.{EXTENSION}")))
    }

    /// Load every document of a collection, in file order.
    async fn load(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let path = self.collection_path(collection)?;
        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let (complete, tail) = match text.rfind('\n') {
            Some(end) => text.split_at(end + 1),
            None => ("", text.as_str()),
        };
        let mut docs = complete
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str(line).map_err(|e| StoreError::CorruptDocument {
                    collection: collection.to_string(),
                    line: idx + 1,
                    reason: e.to_string(),
                })
            })
            .collect::<StoreResult<Vec<Document>>>()?;
        if !tail.trim().is_empty() {
            match serde_json::from_str(tail) {
                Ok(doc) => docs.push(doc),
                Err(e) => {
                    tracing::warn!(collection, reason = %e, "skipping unterminated trailing line")
                }
            }
        }
        Ok(docs)
    }

    /// Make the file end on a line boundary before appending.
    ///
    /// A parseable unterminated last line gets its newline prepended to
    /// `buf`; an unparseable one is truncated away. Returns the length the
    /// file should be rolled back to if the append fails.
    async fn repair_tail(
        &self,
        file: &mut File,
        collection: &str,
        buf: &mut Vec<u8>,
    ) -> StoreResult<u64> {
        let len = file.metadata().await?.len();
        if len == 0 {
            return Ok(0);
        }
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1)).await?;
        file.read_exact(&mut last).await?;
        if last[0] == b'\n' {
            return Ok(len);
        }

        let mut bytes = Vec::with_capacity(len as usize);
        file.seek(SeekFrom::Start(0)).await?;
        file.read_to_end(&mut bytes).await?;
        let cut = bytes
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |pos| pos + 1);
        if serde_json::from_slice::<Document>(&bytes[cut..]).is_ok() {
            buf.insert(0, b'\n');
            return Ok(len);
        }
        tracing::warn!(collection, dropped = bytes.len() - cut, "truncating torn trailing line");
        file.set_len(cut as u64).await?;
        Ok(cut as u64)
    }

    async fn append(&self, collection: &str, docs: &[Document]) -> StoreResult<()> {
        let path = self.collection_path(collection)?;
        let mut buf = Vec::new();
        for doc in docs {
            serde_json::to_writer(&mut buf, doc)?;
            buf.push(b'\n');
        }
        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .await?;
        let rollback_len = self.repair_tail(&mut file, collection, &mut buf).await?;

        let written: std::io::Result<()> = async {
            file.write_all(&buf).await?;
            file.flush().await
        }
        .await;
        if let Err(e) = written {
            if let Err(trunc) = file.set_len(rollback_len).await {
                tracing::error!(collection, error = %trunc, "failed to roll back partial write");
            }
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    fn backend(&self) -> &'static str {
        "file"
    }

    async fn ping(&self) -> StoreResult<()> {
        self.ensure_open().await
    }

    async fn insert(
        &self,
        collection: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<DocumentId> {
        self.ensure_open().await?;
        check_fields(&fields)?;
        let id = self.ids.next_id();
        self.append(collection, &[Document::with_id(id, fields)])
            .await?;
        tracing::debug!(collection, %id, "appended document");
        Ok(id)
    }

    async fn insert_many(
        &self,
        collection: &str,
        batch: Vec<Map<String, Value>>,
    ) -> StoreResult<Vec<DocumentId>> {
        self.ensure_open().await?;
        for fields in &batch {
            check_fields(fields)?;
        }
        if batch.is_empty() {
            return Ok(Vec::new());
        }
        let docs: Vec<Document> = batch
            .into_iter()
            .map(|fields| Document::with_id(self.ids.next_id(), fields))
            .collect();
        self.append(collection, &docs).await?;
        tracing::debug!(collection, count = docs.len(), "appended batch");
        Ok(docs.iter().filter_map(|doc| doc.id).collect())
    }

    async fn query(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> StoreResult<Vec<Document>> {
        self.ensure_open().await?;
        Ok(self
            .load(collection)
            .await?
            .into_iter()
            .filter(|doc| doc.matches(filter))
            .take(limit)
            .collect())
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> StoreResult<Option<Document>> {
        self.ensure_open().await?;
        Ok(self
            .load(collection)
            .await?
            .into_iter()
            .find(|doc| doc.id.as_ref() == Some(id)))
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        self.ensure_open().await?;
        Ok(self
            .load(collection)
            .await?
            .iter()
            .filter(|doc| doc.matches(filter))
            .count() as u64)
    }

    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        self.ensure_open().await?;
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if entry.metadata().await?.len() == 0 {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    async fn close(&self) {
        self.open.store(false, Ordering::Release);
        tracing::debug!(dir = %self.dir.display(), "file store closed");
    }
}

impl std::fmt::Debug for FileDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDocumentStore")
            .field("dir", &self.dir)
            .field("open", &self.open.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
