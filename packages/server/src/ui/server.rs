//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use hiroba_shared::time::Clock;
use tower_http::trace::TraceLayer;

use crate::{
    domain::RoomAllowList,
    usecase::{ConnectionManager, ListRoomsUseCase},
};

use super::{
    handler::{debug_rooms, get_rooms, health_check, index, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket chat server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(allow_list, connection_manager, list_rooms_usecase, clock);
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    allow_list: Arc<RoomAllowList>,
    /// ConnectionManager（参加・退出・ブロードキャスト）
    connection_manager: Arc<ConnectionManager>,
    /// ListRoomsUseCase（ルーム一覧取得のユースケース）
    list_rooms_usecase: Arc<ListRoomsUseCase>,
    clock: Arc<dyn Clock>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        allow_list: Arc<RoomAllowList>,
        connection_manager: Arc<ConnectionManager>,
        list_rooms_usecase: Arc<ListRoomsUseCase>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            allow_list,
            connection_manager,
            list_rooms_usecase,
            clock,
        }
    }

    /// Build the router with all endpoints
    pub fn into_router(self) -> Router {
        let app_state = Arc::new(AppState {
            allow_list: self.allow_list,
            connection_manager: self.connection_manager,
            list_rooms_usecase: self.list_rooms_usecase,
            clock: self.clock,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws/{room}", get(websocket_handler))
            // HTTP エンドポイント
            .route("/", get(index))
            .route("/api/rooms", get(get_rooms))
            .route("/api/health", get(health_check))
            .route("/debug/rooms", get(debug_rooms))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the WebSocket chat server
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.into_router();

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!(
            "WebSocket chat server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws/{{room}}", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
