//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの送信キュー（上限付きの `Sender`）を管理
//! - イベントを JSON にエンコードし、送信キューへ積む（push_to, broadcast）
//! - キューが溢れた接続の登録を解除する
//!
//! ## 設計ノート
//!
//! ソケットへの書き込みは UI 層（`ui/handler/websocket.rs`）の配送タスクが行います。
//! この実装は `try_send` でキューへ積むだけなので、遅い接続がブロードキャスト全体を
//! 止めることはありません。キューが溢れた接続は送信側を破棄するため、配送タスクは
//! 残りを書き出した後に終了し、セッションが退出処理を行います。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::{
    domain::{ConnectionId, DeliveryError, MessagePusher, PusherChannel, RoomEvent},
    infrastructure::dto::websocket::OutboundFrame,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
/// pusher.register_client(connection_id, tx).await;
/// pusher.push_to(&connection_id, &event).await?;
/// ```
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信キュー
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登録済みの接続数
    pub async fn count_clients(&self) -> usize {
        self.clients.lock().await.len()
    }

    fn encode(event: &RoomEvent) -> Option<String> {
        match OutboundFrame::from(event).to_json() {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::error!("Failed to encode outbound frame: {}", e);
                None
            }
        }
    }

    /// 1 つの接続の送信キューへ積む
    fn offer(
        clients: &mut HashMap<ConnectionId, PusherChannel>,
        connection_id: &ConnectionId,
        content: String,
    ) -> Result<(), DeliveryError> {
        let sender = clients
            .get(connection_id)
            .ok_or_else(|| DeliveryError::ConnectionNotFound(connection_id.to_string()))?;
        match sender.try_send(content) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                clients.remove(connection_id);
                Err(DeliveryError::QueueFull(connection_id.to_string()))
            }
            Err(TrySendError::Closed(_)) => {
                Err(DeliveryError::ChannelClosed(connection_id.to_string()))
            }
        }
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(connection_id).is_some() {
            tracing::debug!(
                "Connection '{}' unregistered from MessagePusher",
                connection_id
            );
        }
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &RoomEvent,
    ) -> Result<(), DeliveryError> {
        let Some(content) = Self::encode(event) else {
            return Ok(());
        };
        let mut clients = self.clients.lock().await;

        Self::offer(&mut clients, connection_id, content)?;
        tracing::debug!("Pushed frame to connection '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(&self, targets: &[ConnectionId], event: &RoomEvent) -> usize {
        let Some(content) = Self::encode(event) else {
            return 0;
        };
        let mut clients = self.clients.lock().await;

        let mut delivered = 0;
        for target in targets {
            // ブロードキャストでは一部の送信失敗を許容
            match Self::offer(&mut clients, target, content.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!("Skipping connection during broadcast: {}", e),
            }
        }

        tracing::debug!("Broadcasted frame to {}/{} connections", delivered, targets.len());
        delivered
    }
}
