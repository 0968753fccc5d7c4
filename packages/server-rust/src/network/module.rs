//! Network module with deferred startup lifecycle.
//!
//! `new()` records the configuration, `start()` binds the TCP listener and
//! `serve()` accepts connections. Registries are filled and published between
//! `start()` and `serve()`, once the bound port is known.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context as _;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use super::config::NetworkConfig;
use super::handlers::{health_handler, liveness_handler, AppState};
use super::middleware::build_http_layers;

/// Manages the HTTP server lifecycle.
pub struct NetworkModule {
    config: NetworkConfig,
    listener: Option<TcpListener>,
    start_time: Instant,
}

impl NetworkModule {
    /// Creates a new network module without binding any port.
    #[must_use]
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            config,
            listener: None,
            start_time: Instant::now(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Merges `routes` with the health routes and applies the HTTP layers.
    ///
    /// Routes added here:
    /// - `GET /health` -- health JSON
    /// - `GET /health/live` -- liveness probe
    pub fn build_router(&self, routes: Router) -> Router {
        let state = AppState {
            config: Arc::new(self.config.clone()),
            start_time: self.start_time,
        };

        let health = Router::new()
            .route("/health", get(health_handler))
            .route("/health/live", get(liveness_handler))
            .with_state(state);

        routes
            .merge(health)
            .layer(build_http_layers(&self.config))
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the actual bound port, which differs from the configured one
    /// when port 0 is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = self.config.bind_address();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("binding {addr}"))?;
        let port = listener.local_addr()?.port();

        info!("TCP listener bound to {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves `routes` until the shutdown signal fires.
    ///
    /// Consumes `self` because the listener is moved into the server.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called first or the server hits
    /// a fatal I/O error.
    pub async fn serve(
        mut self,
        routes: Router,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let listener = self
            .listener
            .take()
            .context("start() must be called before serve()")?;
        let router = self.build_router(routes);

        info!("Serving HTTP connections");
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("Server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    fn local() -> NetworkConfig {
        NetworkConfig {
            host: "127.0.0.1".to_string(),
            ..NetworkConfig::default()
        }
    }

    #[test]
    fn new_creates_module_without_binding() {
        let module = NetworkModule::new(NetworkConfig::default());
        assert!(module.listener.is_none());
    }

    #[tokio::test]
    async fn router_serves_health_and_extra_routes() {
        let module = NetworkModule::new(NetworkConfig::default());
        let router = module.build_router(Router::new().route("/hello", get(|| async { "hi" })));

        for path in ["/health", "/health/live", "/hello"] {
            let response = router
                .clone()
                .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{path}");
        }
    }

    #[tokio::test]
    async fn start_binds_to_os_assigned_port() {
        let mut module = NetworkModule::new(local());
        let port = module.start().await.expect("start should succeed");
        assert!(port > 0, "OS-assigned port should be > 0");
        assert!(module.listener.is_some());
    }

    #[tokio::test]
    async fn serve_without_start_is_an_error() {
        let module = NetworkModule::new(NetworkConfig::default());
        let err = module
            .serve(Router::new(), std::future::pending::<()>())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("start() must be called"));
    }

    #[tokio::test]
    async fn serve_stops_on_shutdown_signal() {
        let mut module = NetworkModule::new(local());
        module.start().await.unwrap();
        module.serve(Router::new(), async {}).await.unwrap();
    }
}
