//! Room-based WebSocket chat relay.
//!
//! Clients connect to `/ws/{room}` and receive every message posted to that
//! room along with online-count updates.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000 --rooms general,games
//! ```

use std::sync::Arc;

use clap::Parser;
use hiroba_server::{
    config::ServerConfig,
    infrastructure::message_pusher::WebSocketMessagePusher,
    ui::Server,
    usecase::{ConnectionManager, ListRoomsUseCase},
};
use hiroba_shared::{logger::setup_logger, time::SystemClock};

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(&[env!("CARGO_CRATE_NAME"), "tower_http"], &config.log_level);

    let (allow_list, policy) = match (config.allow_list(), config.room_policy()) {
        (Ok(allow_list), Ok(policy)) => (Arc::new(allow_list), policy),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize dependencies in order:
    // 1. MessagePusher
    // 2. UseCases
    // 3. Server

    // 1. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 2. Create UseCases
    let connection_manager = Arc::new(ConnectionManager::new(
        &allow_list,
        policy,
        message_pusher,
    ));
    let list_rooms_usecase = Arc::new(ListRoomsUseCase::new(allow_list.clone()));
    tracing::info!(
        "Serving rooms: {}",
        allow_list
            .rooms()
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    // 3. Create and run the server
    let server = Server::new(
        allow_list,
        connection_manager,
        list_rooms_usecase,
        Arc::new(SystemClock),
    );
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
