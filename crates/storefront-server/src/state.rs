use std::sync::Arc;

use storefront_catalog::Catalog;

use crate::config::ServerConfig;

/// Shared per-process state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub catalog: Catalog,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(catalog: Catalog, config: ServerConfig) -> Self {
        Self {
            catalog,
            config: Arc::new(config),
        }
    }
}
