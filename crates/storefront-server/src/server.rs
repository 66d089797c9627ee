use std::future::Future;
use std::sync::Arc;

use storefront_catalog::Catalog;
use storefront_store::Database;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Storefront HTTP server.
///
/// Owns the database handle for the life of the process: it is opened by
/// [`connect`](Self::connect) and closed when serving stops.
pub struct StorefrontServer {
    config: ServerConfig,
    db: Arc<Database>,
    catalog: Catalog,
}

impl StorefrontServer {
    /// Connect to the configured database and build the server.
    pub async fn connect(config: ServerConfig) -> ServerResult<Self> {
        let db = Database::connect(&config.database.url, &config.database.name).await?;
        Ok(Self::with_database(config, Arc::new(db)))
    }

    /// Build the server around an already connected database.
    pub fn with_database(config: ServerConfig, db: Arc<Database>) -> Self {
        let catalog = Catalog::new(Arc::clone(&db));
        Self {
            config,
            db,
            catalog,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(AppState::new(self.catalog.clone(), self.config.clone()))
    }

    /// Serve until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        self.serve_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "cannot listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Serve until `shutdown` resolves, then close the database.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.config.seed_on_start {
            let report = self.catalog.seed_products().await?;
            tracing::info!(
                inserted = report.inserted_count,
                status = ?report.status,
                "startup seed finished"
            );
        }

        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("Storefront server listening on {}", self.config.bind_addr);
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()));

        self.db.close().await;
        tracing::info!("Storefront server stopped");
        result
    }
}

impl std::fmt::Debug for StorefrontServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontServer")
            .field("bind_addr", &self.config.bind_addr)
            .field("database", &self.db)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_store::InMemoryDocumentStore;

    fn local_config() -> ServerConfig {
        ServerConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            ..ServerConfig::default()
        }
    }

    #[tokio::test]
    async fn server_construction() {
        let server = StorefrontServer::connect(ServerConfig::default()).await.unwrap();
        assert_eq!(server.config().bind_addr.port(), 8000);
        assert_eq!(server.catalog().database().backend(), "memory");
    }

    #[tokio::test]
    async fn unsupported_database_url_fails_to_connect() {
        let mut config = ServerConfig::default();
        config.database.url = "redis://localhost".into();
        let err = StorefrontServer::connect(config).await.unwrap_err();
        assert!(matches!(err, ServerError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn shutdown_closes_database() {
        let db = Arc::new(Database::in_memory("test"));
        let server = StorefrontServer::with_database(local_config(), Arc::clone(&db));
        server.serve_with_shutdown(async {}).await.unwrap();
        assert!(db.ping().await.unwrap_err().is_unavailable());
    }

    #[tokio::test]
    async fn seed_on_start_fills_empty_catalog() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let db = Arc::new(Database::from_store("test", store.clone()));
        let config = ServerConfig {
            seed_on_start: true,
            ..local_config()
        };
        StorefrontServer::with_database(config, db)
            .serve_with_shutdown(async {})
            .await
            .unwrap();
        assert_eq!(store.len().await, 4);
    }
}
