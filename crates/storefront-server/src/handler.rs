use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use storefront_catalog::SeedReport;
use storefront_store::{serialize, serialize_all};
use storefront_types::{DocumentId, Order, Product};

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Body of a successful create.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}

impl From<DocumentId> for CreatedResponse {
    fn from(id: DocumentId) -> Self {
        Self { id: id.to_hex() }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// Store section of the health report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreHealth {
    pub backend: String,
    pub available: bool,
    pub collections: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health report. Says whether the database variables are set, never what
/// they are set to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database_name: String,
    pub store: StoreHealth,
    pub database_url_set: bool,
    pub database_name_set: bool,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ServerResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ServerError::Validation(rejection.body_text()))
}

fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> ServerResult<T> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| ServerError::Validation(rejection.body_text()))
}

/// Root handler.
pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "E-Commerce backend is running" }))
}

pub async fn create_product_handler(
    State(state): State<AppState>,
    payload: Result<Json<Product>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<CreatedResponse>)> {
    let product = json_body(payload)?;
    let id = state.catalog.create_product(&product).await?;
    Ok((StatusCode::CREATED, Json(id.into())))
}

pub async fn list_products_handler(
    State(state): State<AppState>,
    params: Result<Query<ProductQuery>, QueryRejection>,
) -> ServerResult<Json<Vec<Value>>> {
    let params = query_params(params)?;
    // An empty category means "no filter".
    let category = params.category.as_deref().filter(|c| !c.is_empty());
    let limit = params.limit.unwrap_or(state.config.default_limit);
    let docs = state.catalog.list_products(category, limit).await?;
    Ok(Json(serialize_all(&docs)))
}

pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Value>> {
    let doc = state.catalog.get_product(&id).await?;
    let view = serialize(Some(&doc))
        .ok_or_else(|| ServerError::Internal("serializer dropped a stored document".into()))?;
    Ok(Json(Value::Object(view)))
}

pub async fn seed_products_handler(State(state): State<AppState>) -> ServerResult<Json<SeedReport>> {
    Ok(Json(state.catalog.seed_products().await?))
}

pub async fn create_order_handler(
    State(state): State<AppState>,
    payload: Result<Json<Order>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<CreatedResponse>)> {
    let order = json_body(payload)?;
    let id = state.catalog.create_order(&order).await?;
    Ok((StatusCode::CREATED, Json(id.into())))
}

pub async fn list_orders_handler(
    State(state): State<AppState>,
    params: Result<Query<LimitQuery>, QueryRejection>,
) -> ServerResult<Json<Vec<Value>>> {
    let params = query_params(params)?;
    let limit = params.limit.unwrap_or(state.config.default_limit);
    let docs = state.catalog.list_orders(limit).await?;
    Ok(Json(serialize_all(&docs)))
}

/// Health check handler. Always answers 200; store problems are reported
/// in the body.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let diag = state.catalog.diagnostics().await;
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        database_name: diag.database_name,
        store: StoreHealth {
            backend: diag.backend,
            available: diag.available,
            collections: diag.collections,
            error: diag.error,
        },
        database_url_set: state.config.env.database_url,
        database_name_set: state.config.env.database_name,
    })
}
