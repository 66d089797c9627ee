//! Foundation types for Storefront.
//!
//! This crate provides the identifier and schema types shared by every other
//! Storefront crate.
//!
//! # Key Types
//!
//! - [`DocumentId`] — Native 12-byte document identifier with a 24-char hex wire form
//! - [`IdGenerator`] — Issues fresh, never-repeating [`DocumentId`]s
//! - [`Schema`] — Binds a document type to the collection it lives in
//! - [`Product`], [`Order`], [`OrderItem`] — The stored document schemas

pub mod error;
pub mod id;
pub mod order;
pub mod product;
pub mod schema;

pub use error::{TypeError, TypeResult};
pub use id::{DocumentId, IdGenerator};
pub use order::{Order, OrderItem};
pub use product::Product;
pub use schema::Schema;
