//! # HTTP Server
//!
//! Main HTTP server combining the REST API, the health check and the static
//! front-end behind one listener.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::config::HttpServerConfig;
use super::health::health_routes;
use crate::rest_api::RestServer;
use crate::store::LessonStore;

/// HTTP server for the lesson service
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server over `store` with custom configuration
    pub fn with_config<S: LessonStore + 'static>(config: HttpServerConfig, store: Arc<S>) -> Self {
        let router = Self::build_router(&config, store);
        Self { config, router }
    }

    fn build_router<S: LessonStore + 'static>(config: &HttpServerConfig, store: Arc<S>) -> Router {
        let cors = if config.cors_origins.is_empty() {
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
        };

        Router::new()
            .merge(health_routes())
            .merge(RestServer::new(store).router())
            // Everything else is the front-end
            .fallback_service(ServeDir::new(&config.static_dir))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C (or SIGTERM on Unix).
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        info!(%addr, static_dir = %self.config.static_dir.display(), "Server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryLessonStore;

    fn memory_store() -> Arc<MemoryLessonStore> {
        Arc::new(MemoryLessonStore::new())
    }

    #[test]
    fn test_server_creation() {
        let server = HttpServer::with_config(HttpServerConfig::default(), memory_store());
        assert_eq!(server.socket_addr(), "0.0.0.0:3002");
    }

    #[test]
    fn test_server_with_custom_port() {
        let config = HttpServerConfig::default().with_port(8080);
        let server = HttpServer::with_config(config, memory_store());
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_router_builds_with_cors_origins() {
        let config = HttpServerConfig {
            cors_origins: vec!["http://localhost:5173".to_string()],
            ..Default::default()
        };
        let _router = HttpServer::with_config(config, memory_store()).router();
    }
}
