use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all Storefront endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handler::root_handler))
        .route("/health", get(handler::health_handler))
        .route("/test", get(handler::health_handler))
        .route(
            "/api/products",
            post(handler::create_product_handler).get(handler::list_products_handler),
        )
        .route("/api/products/:id", get(handler::get_product_handler))
        .route("/api/seed-products", post(handler::seed_products_handler))
        .route(
            "/api/orders",
            post(handler::create_order_handler).get(handler::list_orders_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
