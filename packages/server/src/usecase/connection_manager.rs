//! UseCase: ルームへの参加・退出・ブロードキャスト
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectionManager の join / leave / broadcast / broadcast_status
//!
//! ### なぜこのテストが必要か
//! - ルームの状態（接続集合・履歴）を変更するのはこのユースケースだけ
//! - 参加直後の履歴再送とオンライン人数の整合性を保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加・投稿・退出と、それに伴う status 通知
//! - 異常系：許可リストにないルームへの参加、閉じた接続への配送
//! - エッジケース：二重退出、履歴の上限、同時参加

use std::sync::Arc;

use crate::{
    domain::{
        ChatMessage, ConnectionId, DEFAULT_HISTORY_CAPACITY, DEFAULT_OUTBOUND_QUEUE,
        DEFAULT_REPLAY_WINDOW, MessagePusher, PusherChannel, Room, RoomAllowList, RoomEvent,
        RoomId, UnknownRoomError,
    },
    infrastructure::registry::InMemoryRoomRegistry,
};

/// 履歴の保持件数・再送件数と、接続ごとの送信キューの長さ
///
/// 参加時の再送と status がキューに収まるよう、`outbound_queue` は
/// `replay_window` より大きくなければならない（起動時の設定検証で保証する）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomPolicy {
    pub history_capacity: usize,
    pub replay_window: usize,
    pub outbound_queue: usize,
}

impl Default for RoomPolicy {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            replay_window: DEFAULT_REPLAY_WINDOW,
            outbound_queue: DEFAULT_OUTBOUND_QUEUE,
        }
    }
}

/// join の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinSummary {
    /// 新しい接続に再送した履歴の件数
    pub replayed: usize,
    /// 参加後のオンライン人数
    pub online: usize,
}

/// 接続とルームの管理
///
/// ルームレジストリを所有し、その唯一の変更者となる。全ての操作はルーム単位で
/// 排他され、別のルームの操作とは並行に進む。
pub struct ConnectionManager {
    registry: InMemoryRoomRegistry,
    message_pusher: Arc<dyn MessagePusher>,
    replay_window: usize,
    outbound_queue: usize,
}

impl ConnectionManager {
    pub fn new(
        allow_list: &RoomAllowList,
        policy: RoomPolicy,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry: InMemoryRoomRegistry::new(allow_list, policy.history_capacity),
            message_pusher,
            replay_window: policy.replay_window,
            outbound_queue: policy.outbound_queue,
        }
    }

    /// 接続ごとの送信キューの長さ（`join` に渡す `PusherChannel` の作成に使う）
    pub fn outbound_queue(&self) -> usize {
        self.outbound_queue
    }

    /// 接続をルームに参加させる
    ///
    /// 1. 接続を登録する（ルームが無ければ作成）
    /// 2. 直近の履歴をこの接続にだけ再送する
    /// 3. 新しい接続を含む全員に status を送る
    ///
    /// 3 つの手順は同じルームのロック内で行われるため、並行する参加・退出から見て
    /// 不可分になる。
    pub async fn join(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<JoinSummary, UnknownRoomError> {
        let mut slot = self.registry.lock(room_id).await?;

        self.message_pusher
            .register_client(connection_id, sender)
            .await;
        let room = self.registry.open(&mut slot, room_id);
        room.add_connection(connection_id);

        let replay = room.replay(self.replay_window);
        for message in &replay {
            let event = RoomEvent::Message(message.clone());
            if let Err(e) = self.message_pusher.push_to(&connection_id, &event).await {
                tracing::warn!("Failed to replay history to '{}': {}", connection_id, e);
            }
        }

        let online = self.push_status(room).await;
        tracing::info!(
            "Connection '{}' joined room '{}' (replayed {}, online {})",
            connection_id,
            room_id,
            replay.len(),
            online
        );

        Ok(JoinSummary {
            replayed: replay.len(),
            online,
        })
    }

    /// 接続をルームから外す
    ///
    /// 冪等で、既に外れている場合は何もしない。最後の接続が抜けたルームは履歴ごと
    /// 破棄される。status の送信は呼び出し側が `broadcast_status` で行う。
    ///
    /// 接続が含まれていた場合は `true` を返す。
    pub async fn leave(&self, room_id: &RoomId, connection_id: &ConnectionId) -> bool {
        let mut slot = match self.registry.lock(room_id).await {
            Ok(slot) => slot,
            Err(e) => {
                tracing::warn!("Ignoring leave for '{}': {}", connection_id, e);
                return false;
            }
        };

        self.message_pusher.unregister_client(connection_id).await;

        let Some(room) = slot.as_mut() else {
            return false;
        };
        let removed = room.remove_connection(connection_id);
        if room.is_empty() {
            *slot = None;
            tracing::info!("Room '{}' is empty, history discarded", room_id);
        }
        if removed {
            tracing::info!("Connection '{}' left room '{}'", connection_id, room_id);
        }
        removed
    }

    /// メッセージを履歴に追加し、ルームの全接続に送る
    ///
    /// 宛先のルームは `message.room`。ルームが存在しない（誰も参加していない）場合は
    /// 履歴にも残さず捨てる。配送できた接続数を返す。
    pub async fn broadcast(&self, message: ChatMessage) -> Result<usize, UnknownRoomError> {
        let room_id = message.room.clone();
        let mut slot = self.registry.lock(&room_id).await?;

        let Some(room) = slot.as_mut() else {
            tracing::warn!("Dropping message for room '{}' with no connections", room_id);
            return Ok(0);
        };

        room.record(message.clone());
        let targets = room.connection_snapshot();
        let delivered = self
            .message_pusher
            .broadcast(&targets, &RoomEvent::Message(message))
            .await;
        tracing::debug!(
            "Broadcasted message in room '{}' to {}/{} connections",
            room_id,
            delivered,
            targets.len()
        );
        Ok(delivered)
    }

    /// 現在のオンライン人数をルームの全接続に送る
    ///
    /// ルームが存在しない場合の人数は 0 で、送り先も無い。人数を返す。
    pub async fn broadcast_status(&self, room_id: &RoomId) -> usize {
        let slot = match self.registry.lock(room_id).await {
            Ok(slot) => slot,
            Err(e) => {
                tracing::warn!("Ignoring status broadcast: {}", e);
                return 0;
            }
        };

        match slot.as_ref() {
            Some(room) => self.push_status(room).await,
            None => 0,
        }
    }

    /// 存在するルームのコピー
    pub async fn snapshot(&self) -> Vec<Room> {
        self.registry.snapshot().await
    }

    async fn push_status(&self, room: &Room) -> usize {
        let status = room.status();
        let online = status.online;
        self.message_pusher
            .broadcast(&room.connection_snapshot(), &RoomEvent::Status(status))
            .await;
        online
    }
}
