use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use storefront_catalog::CatalogError;
use storefront_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    NotFound(String),

    #[error("malformed identifier: {0}")]
    MalformedIdentifier(String),

    #[error("invalid product ID: {0}")]
    InvalidReference(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("store error: {0}")]
    Store(StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MalformedIdentifier(_) | Self::InvalidReference(_) | Self::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Store(_) | Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable error kind reported in response bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NotFound",
            Self::MalformedIdentifier(_) => "MalformedIdentifier",
            Self::InvalidReference(_) => "InvalidReference",
            Self::Validation(_) => "ValidationError",
            Self::StoreUnavailable(_) => "StoreUnavailable",
            Self::Store(_) => "StoreError",
            Self::Config(_) => "ConfigError",
            Self::Io(_) | Self::Internal(_) => "InternalError",
        }
    }
}

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => Self::StoreUnavailable(msg),
            StoreError::NotFound { collection, .. } => {
                Self::NotFound(format!("{} not found", capitalize(&collection)))
            }
            other => Self::Store(other),
        }
    }
}

impl From<CatalogError> for ServerError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::InvalidReference(id) => Self::InvalidReference(id),
            CatalogError::MalformedIdentifier(id) => Self::MalformedIdentifier(id),
            CatalogError::Validation(msg) => Self::Validation(msg),
            CatalogError::Store(err) => err.into(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        let body = json!({ "error": self.kind(), "detail": self.to_string() });
        (status, Json(body)).into_response()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
