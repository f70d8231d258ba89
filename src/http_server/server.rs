//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.

use std::future::Future;
use std::sync::Arc;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::observability::{log_event_with_fields, Event};

use super::book_routes::book_routes;
use super::config::HttpServerConfig;
use super::middleware::request_logger;
use super::observability_routes::{health_routes, observability_routes};
use super::page_routes::page_routes;
use super::state::CatalogState;

/// HTTP server for the bookstore catalog
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with default configuration
    pub fn new(state: Arc<CatalogState>) -> Self {
        Self::with_config(HttpServerConfig::default(), state)
    }

    /// Create a new HTTP server with custom configuration
    pub fn with_config(config: HttpServerConfig, state: Arc<CatalogState>) -> Self {
        let router = build_router(&config, state);
        Self { config, router }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until `shutdown` resolves
    pub async fn start<F>(self, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr).await?;
        let local = listener.local_addr()?.to_string();

        log_event_with_fields(
            Event::Serving,
            &[
                ("addr", &local),
                ("static_dir", &self.config.static_dir.display().to_string()),
            ],
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

fn cors_layer(config: &HttpServerConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Build the combined router with all endpoints
pub fn build_router(config: &HttpServerConfig, state: Arc<CatalogState>) -> Router {
    Router::new()
        // Health check at root level
        .merge(health_routes(state.clone()))
        // JSON API under /api
        .nest("/api", book_routes(state.clone()))
        // Browser pages at the root
        .merge(page_routes(state.clone()))
        // Observability routes under /observability
        .nest("/observability", observability_routes(state.clone()))
        // Stylesheets
        .nest_service("/css", ServeDir::new(&config.static_dir))
        .layer(middleware::from_fn_with_state(state, request_logger))
        .layer(cors_layer(config))
}
