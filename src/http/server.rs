//! # HTTP Server
//!
//! Binds the user and health routers to a TCP listener.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::routes::{UserState, health_routes, user_routes};
use crate::config::ServerConfig;
use crate::error::Result;
use crate::storage::UserStore;

/// HTTP server for the user API
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(store: UserStore, config: ServerConfig) -> Self {
        let router = Self::build_router(store);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    pub fn build_router(store: UserStore) -> Router {
        let state = Arc::new(UserState::new(store));

        Router::new()
            .merge(health_routes())
            .merge(user_routes(state))
            .layer(TraceLayer::new_for_http())
    }

    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C.
    pub async fn start(self) -> Result<()> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(addr.as_str()).await?;
        info!(addr = %listener.local_addr()?, "userdb HTTP server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("userdb HTTP server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
