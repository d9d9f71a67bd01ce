// Sanctum - HTTP server module
// Serves the chat companion API

mod handlers;

pub use handlers::{create_router, AppError};

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::chat::ChatEngine;
use crate::store::ChatHistoryStore;

/// Configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080")
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Main companion server structure
pub struct CompanionServer {
    /// Chat core (validation, crisis pipeline, dispatch)
    engine: Arc<ChatEngine>,
    /// Chat history, read directly for the history endpoint
    history: Arc<dyn ChatHistoryStore>,
    /// Server configuration
    config: ServerConfig,
}

impl CompanionServer {
    pub fn new(
        engine: Arc<ChatEngine>,
        history: Arc<dyn ChatHistoryStore>,
        config: ServerConfig,
    ) -> Self {
        Self {
            engine,
            history,
            config,
        }
    }

    /// Start the HTTP server
    pub async fn serve(self) -> Result<()> {
        let addr: SocketAddr = self.config.bind_address.parse()?;

        let app_state = Arc::new(self);
        let app = create_router(app_state).layer(TraceLayer::new_for_http());

        tracing::info!("Starting Sanctum companion server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    pub fn engine(&self) -> &Arc<ChatEngine> {
        &self.engine
    }

    pub fn history(&self) -> &Arc<dyn ChatHistoryStore> {
        &self.history
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
