//! WebSocket connection handlers.

use std::{fmt, sync::Arc, time::Duration};

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::{Sink, SinkExt},
    stream::{SplitStream, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, RoomId},
    infrastructure::dto::websocket::InboundFrame,
    ui::state::AppState,
};

/// Upper bound on a single socket write before the client is considered stalled
const SOCKET_WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
enum DisconnectReason {
    /// Client sent a close frame
    ClientClosed,
    /// Inbound stream ended without a close frame
    StreamEnded,
    /// Reading from the socket failed
    TransportError(String),
    /// Writing to the socket failed, stalled, or the outbound queue was closed
    SendFailed,
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientClosed => f.write_str("client closed the connection"),
            Self::StreamEnded => f.write_str("stream ended"),
            Self::TransportError(e) => write!(f, "transport error: {e}"),
            Self::SendFailed => f.write_str("stopped writing to socket"),
        }
    }
}

/// `GET /ws/{room}`
///
/// Rooms outside the allow-list are rejected before the upgrade, so the
/// client gets no frames and nothing in the registry is touched.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let room_id = match state.allow_list.resolve(&room) {
        Ok(room_id) => room_id,
        Err(e) => {
            tracing::warn!("Rejecting connection: {}", e);
            return Err(StatusCode::FORBIDDEN);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, room_id)))
}

/// Spawns a task that receives frames from the rx channel and pushes them to the WebSocket sender.
///
/// Each connection has its own task, so a slow client only delays its own
/// queue and never a broadcast. The task ends when the queue is closed, when a
/// write fails, or when a write does not finish within `write_timeout`.
fn pusher_loop<S>(
    mut rx: mpsc::Receiver<String>,
    mut sender: S,
    write_timeout: Duration,
) -> tokio::task::JoinHandle<()>
where
    S: Sink<Message> + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            let write = sender.send(Message::Text(frame.into()));
            match tokio::time::timeout(write_timeout, write).await {
                Ok(Ok(())) => {}
                Ok(Err(_)) => break,
                Err(_) => {
                    tracing::warn!("Socket write timed out after {:?}", write_timeout);
                    break;
                }
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, room_id: RoomId) {
    let connection_id = ConnectionId::generate();
    let (sender, receiver) = socket.split();

    let (tx, rx) = mpsc::channel(state.connection_manager.outbound_queue());
    let mut send_task = pusher_loop(rx, sender, SOCKET_WRITE_TIMEOUT);

    if let Err(e) = state
        .connection_manager
        .join(&room_id, connection_id, tx)
        .await
    {
        tracing::warn!("Connection '{}' could not join: {}", connection_id, e);
        send_task.abort();
        return;
    }

    let mut recv_task = tokio::spawn(receive_loop(
        receiver,
        state.clone(),
        room_id.clone(),
        connection_id,
    ));

    // If any one of the tasks completes, abort the other
    let reason = tokio::select! {
        result = &mut recv_task => {
            send_task.abort();
            result.unwrap_or_else(|e| DisconnectReason::TransportError(e.to_string()))
        }
        _ = &mut send_task => {
            recv_task.abort();
            DisconnectReason::SendFailed
        }
    };
    tracing::info!(
        "Connection '{}' in room '{}' disconnected: {}",
        connection_id,
        room_id,
        reason
    );

    state
        .connection_manager
        .leave(&room_id, &connection_id)
        .await;
    state.connection_manager.broadcast_status(&room_id).await;
}

async fn receive_loop(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    room_id: RoomId,
    connection_id: ConnectionId,
) -> DisconnectReason {
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => return DisconnectReason::TransportError(e.to_string()),
        };

        match msg {
            Message::Text(text) => {
                tracing::debug!("Received text from '{}': {}", connection_id, text.as_str());
                handle_text(&state, &room_id, connection_id, text.as_str()).await;
            }
            Message::Binary(data) => {
                tracing::debug!(
                    "Ignoring binary frame ({} bytes) from '{}'",
                    data.len(),
                    connection_id
                );
            }
            // Ping/pong is handled automatically by the WebSocket protocol
            Message::Ping(_) | Message::Pong(_) => {}
            Message::Close(_) => return DisconnectReason::ClientClosed,
        }
    }
    DisconnectReason::StreamEnded
}

async fn handle_text(state: &AppState, room_id: &RoomId, connection_id: ConnectionId, text: &str) {
    let frame = match InboundFrame::decode(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!("Dropping frame from '{}': {}", connection_id, e);
            return;
        }
    };

    let message = frame.into_message(room_id.clone(), state.clock.now());
    if let Err(e) = state.connection_manager.broadcast(message).await {
        tracing::warn!("Failed to broadcast message from '{}': {}", connection_id, e);
    }
}
