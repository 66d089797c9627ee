//! HTTP server for Storefront.
//!
//! Exposes product and order endpoints over the document store, plus a
//! health report on store availability.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::{DatabaseConfig, EnvPresence, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use handler::{CreatedResponse, HealthResponse};
pub use server::StorefrontServer;
pub use state::AppState;
