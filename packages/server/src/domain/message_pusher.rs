//! MessagePusher trait 定義
//!
//! 接続へのイベント送信（通知）の抽象化。ドメイン層がインターフェースを定義し、
//! Infrastructure 層が具体的な実装（WebSocket など）を提供する。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{entity::RoomEvent, error::DeliveryError, value_object::ConnectionId};

/// 送信キューの既定の長さ
pub const DEFAULT_OUTBOUND_QUEUE: usize = 256;

/// 設定で指定できる送信キューの長さの上限
pub const MAX_OUTBOUND_QUEUE: usize = 65_536;

/// 接続ごとの送信キュー
///
/// 受信側は接続ごとの配送タスクが持ち、ソケットへ書き出す。キューが溢れた接続は
/// 読み取りが追いついていないとみなし、登録を解除して切断させる。
pub type PusherChannel = mpsc::Sender<String>;

/// 接続へのイベント送信
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信キューを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信キューを登録解除（存在しない場合は何もしない）
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 1 つの接続にイベントを送信（キューに積むだけで待たない）
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &RoomEvent,
    ) -> Result<(), DeliveryError>;

    /// 複数の接続にイベントを送信し、配送できた数を返す
    ///
    /// 1 つの接続への送信失敗は他の接続への送信を妨げない。
    async fn broadcast(&self, targets: &[ConnectionId], event: &RoomEvent) -> usize;
}
