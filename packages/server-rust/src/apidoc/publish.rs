//! HTTP publishers for the generated documents.
//!
//! Each publisher consumes its registry and returns an axum [`Router`] with a
//! single `GET` route. The document is regenerated on every request.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tracing::{error, info};

use super::registry::ApiRegistry;
use super::topics::TopicRegistry;

/// Serialization failure while rendering a document.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Error creating YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Error creating JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl IntoResponse for PublishError {
    fn into_response(self) -> Response {
        error!(error = %self, "document rendering failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain")],
            self.to_string(),
        )
            .into_response()
    }
}

#[derive(Clone)]
struct OpenApiState {
    registry: Arc<ApiRegistry>,
    base_url: Arc<str>,
}

/// Serves the OpenAPI document as `text/yaml` on `GET {path}`.
#[must_use]
pub fn openapi_router(registry: ApiRegistry, base_url: &str, path: &str) -> Router {
    info!("API schema available at {base_url}{path}");
    Router::new()
        .route(path, get(serve_openapi))
        .with_state(OpenApiState {
            registry: Arc::new(registry),
            base_url: Arc::from(base_url),
        })
}

/// Serves the topic document as `text/json` on `GET {path}`.
#[must_use]
pub fn topic_router(registry: TopicRegistry, base_url: &str, path: &str) -> Router {
    info!("Topic schema available at {base_url}{path}");
    Router::new()
        .route(path, get(serve_topics))
        .with_state(Arc::new(registry))
}

impl ApiRegistry {
    /// Consumes the registry into its publishing router.
    #[must_use]
    pub fn publish(self, base_url: &str, path: &str) -> Router {
        openapi_router(self, base_url, path)
    }
}

impl TopicRegistry {
    /// Consumes the registry into its publishing router.
    #[must_use]
    pub fn publish(self, base_url: &str, path: &str) -> Router {
        topic_router(self, base_url, path)
    }
}

async fn serve_openapi(State(state): State<OpenApiState>) -> Result<Response, PublishError> {
    let yaml = state.registry.generate_document(&state.base_url).to_yaml()?;
    Ok(([(header::CONTENT_TYPE, "text/yaml")], yaml).into_response())
}

async fn serve_topics(State(registry): State<Arc<TopicRegistry>>) -> Result<Response, PublishError> {
    let json = registry.to_json()?;
    Ok(([(header::CONTENT_TYPE, "text/json")], json).into_response())
}
