//! Server Implementation
//!
//! HTTP server startup and graceful shutdown

use http::{HeaderValue, Method};
use tower_http::cors::{Any as CorsAny, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::core::{Config, ServerState};
use crate::utils::AppError;

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    /// Create server over an initialized state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        let app = api::router()
            .with_state(self.state.clone())
            .layer(self.cors_layer()?)
            .layer(TraceLayer::new_for_http());

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to bind {addr}: {e}")))?;

        tracing::info!(%addr, environment = %self.config.environment, "Dashboard server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::Internal(format!("Server error: {e}")))?;

        Ok(())
    }

    fn cors_layer(&self) -> Result<CorsLayer, AppError> {
        let layer = CorsLayer::new().allow_methods([Method::GET]);

        if self.config.allows_any_origin() {
            return Ok(layer.allow_origin(CorsAny).allow_headers(CorsAny));
        }

        let mut origins = Vec::with_capacity(self.config.allowed_origins.len());
        for origin in &self.config.allowed_origins {
            let value = origin
                .parse::<HeaderValue>()
                .map_err(|_| AppError::Config(format!("Invalid CORS origin: {origin}")))?;
            origins.push(value);
        }
        Ok(layer.allow_origin(origins).allow_headers(CorsAny))
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received");
}
