//! Product and order operations for Storefront.
//!
//! Sits between the HTTP surface and the document store:
//!
//! - [`OrderValidator`] -- checks that every order line references an
//!   existing product
//! - [`Seeder`] -- inserts a starter dataset into an empty collection
//! - [`Catalog`] -- the operations the API exposes, built from the two above
//!   and the typed product/order collections
//!
//! Validate-then-insert and check-then-seed are deliberately not
//! transactional; concurrent callers can interleave between the steps.

pub mod catalog;
pub mod dataset;
pub mod error;
pub mod seeder;
pub mod validator;

pub use catalog::{Catalog, Diagnostics};
pub use dataset::starter_products;
pub use error::{CatalogError, CatalogResult};
pub use seeder::{SeedReport, SeedStatus, Seeder};
pub use validator::OrderValidator;
