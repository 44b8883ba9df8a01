//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::SessionBroadcaster;

use super::{
    handler::{get_problems, get_state, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Countdown session server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(broadcaster);
/// server.run("127.0.0.1".to_string(), 3000).await?;
/// ```
pub struct Server {
    /// SessionBroadcaster（セッション操作と配信のユースケース）
    broadcaster: Arc<SessionBroadcaster>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `broadcaster` - UseCase owning the session and the connected clients
    pub fn new(broadcaster: Arc<SessionBroadcaster>) -> Self {
        Self { broadcaster }
    }

    /// Build the router with every endpoint attached
    pub fn router(&self) -> Router {
        let app_state = Arc::new(AppState {
            broadcaster: self.broadcaster.clone(),
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/state", get(get_state))
            .route("/api/problems", get(get_problems))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the server on `host:port` until a shutdown signal arrives
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;
        tracing::info!("Connect to: ws://{}/ws", listener.local_addr()?);
        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(self, listener: TcpListener) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        tracing::info!("Countdown server listening on {}", listener.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
