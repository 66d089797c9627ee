//! Document storage for Storefront.
//!
//! A thin, collection-parameterized persistence façade over a document
//! database. Every stored document carries exactly one native
//! [`DocumentId`](storefront_types::DocumentId), assigned by the store at
//! insert time and never reused.
//!
//! # Storage Backends
//!
//! All backends implement the [`DocumentStore`] trait:
//!
//! - [`InMemoryDocumentStore`] -- `HashMap`-based store for tests and demos
//! - [`FileDocumentStore`] -- one append-only JSON-lines file per collection
//!
//! [`Database`] is the connection handle built from a URL at startup;
//! [`Collection`] gives typed access to one collection through it.
//!
//! # Design Rules
//!
//! 1. Documents are written verbatim, plus the store-assigned `_id`.
//! 2. Single-document operations are atomic; multi-step sequences are not.
//! 3. Every operation against a closed or unreachable store fails with
//!    [`StoreError::Unavailable`] before touching any data.
//! 4. "Not found" is always reported distinctly from "unavailable".
//! 5. Query order is insertion order on a best-effort basis only.

pub mod collection;
pub mod database;
pub mod document;
pub mod error;
pub mod file;
pub mod filter;
pub mod memory;
pub mod serializer;
pub mod traits;

pub use collection::Collection;
pub use database::Database;
pub use document::{Document, ID_FIELD};
pub use error::{StoreError, StoreResult};
pub use file::FileDocumentStore;
pub use filter::{Filter, DEFAULT_LIMIT};
pub use memory::InMemoryDocumentStore;
pub use serializer::{serialize, serialize_all, PUBLIC_ID_FIELD};
pub use traits::DocumentStore;
