//! Entities
//!
//! - `ChatMessage`: ルームに投稿された不変のメッセージ
//! - `StatusEvent`: オンライン人数の通知（履歴には残らない）
//! - `Room`: 接続集合と履歴を持つ放送ドメイン

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};

use super::{
    history::HistoryBuffer,
    value_object::{ConnectionId, RoomId, Username},
};

/// チャットメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub room: RoomId,
    pub username: Username,
    /// 本文（サニタイズしない、空文字も可）
    pub text: String,
    pub sent_at: DateTime<FixedOffset>,
}

impl ChatMessage {
    pub fn new(
        room: RoomId,
        username: Username,
        text: String,
        sent_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            room,
            username,
            text,
            sent_at,
        }
    }
}

/// オンライン人数の通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    pub room: RoomId,
    pub online: usize,
}

impl StatusEvent {
    pub fn new(room: RoomId, online: usize) -> Self {
        Self { room, online }
    }
}

/// 接続へ送り出されるイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    Message(ChatMessage),
    Status(StatusEvent),
}

impl From<ChatMessage> for RoomEvent {
    fn from(message: ChatMessage) -> Self {
        Self::Message(message)
    }
}

impl From<StatusEvent> for RoomEvent {
    fn from(status: StatusEvent) -> Self {
        Self::Status(status)
    }
}

/// ルーム
///
/// 最初の参加時に作られ、接続が 0 になった時点で履歴ごと破棄される。
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    connections: HashSet<ConnectionId>,
    history: HistoryBuffer,
}

impl Room {
    pub fn new(id: RoomId, history_capacity: usize) -> Self {
        Self {
            id,
            connections: HashSet::new(),
            history: HistoryBuffer::new(history_capacity),
        }
    }

    /// 接続を追加する。既に存在する場合は `false`
    pub fn add_connection(&mut self, connection_id: ConnectionId) -> bool {
        self.connections.insert(connection_id)
    }

    /// 接続を削除する。存在しない場合は `false`
    pub fn remove_connection(&mut self, connection_id: &ConnectionId) -> bool {
        self.connections.remove(connection_id)
    }

    pub fn online(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// ブロードキャスト用に現在の接続集合をコピーして返す
    pub fn connection_snapshot(&self) -> Vec<ConnectionId> {
        self.connections.iter().copied().collect()
    }

    pub fn record(&mut self, message: ChatMessage) {
        self.history.push(message);
    }

    pub fn replay(&self, window: usize) -> Vec<ChatMessage> {
        self.history.recent(window)
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn status(&self) -> StatusEvent {
        StatusEvent::new(self.id.clone(), self.online())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn general() -> Room {
        Room::new(RoomId::new("general").unwrap(), 3)
    }

    #[test]
    fn test_add_and_remove_connection() {
        // テスト項目: 接続の追加・削除がオンライン人数に反映される
        // given (前提条件):
        let mut room = general();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();

        // when (操作):
        room.add_connection(alice);
        room.add_connection(bob);
        room.remove_connection(&alice);

        // then (期待する結果):
        assert_eq!(room.online(), 1);
        assert_eq!(room.connection_snapshot(), vec![bob]);
    }

    #[test]
    fn test_remove_connection_is_idempotent() {
        // テスト項目: 同じ接続を 2 回削除しても人数は 0 未満にならない
        // given (前提条件):
        let mut room = general();
        let alice = ConnectionId::generate();
        room.add_connection(alice);

        // when (操作):
        let first = room.remove_connection(&alice);
        let second = room.remove_connection(&alice);

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert_eq!(room.online(), 0);
        assert!(room.is_empty());
    }

    #[test]
    fn test_duplicate_connection_is_counted_once() {
        // テスト項目: 同じ接続の二重追加は 1 人として数えられる
        // given (前提条件):
        let mut room = general();
        let alice = ConnectionId::generate();

        // when (操作):
        let first = room.add_connection(alice);
        let second = room.add_connection(alice);

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert_eq!(room.status(), StatusEvent::new(room.id.clone(), 1));
    }

    #[test]
    fn test_connection_snapshot_is_independent_copy() {
        // テスト項目: スナップショット取得後の変更はスナップショットに影響しない
        // given (前提条件):
        let mut room = general();
        let alice = ConnectionId::generate();
        room.add_connection(alice);
        let snapshot = room.connection_snapshot();

        // when (操作):
        room.remove_connection(&alice);

        // then (期待する結果):
        assert_eq!(snapshot, vec![alice]);
        assert!(room.connection_snapshot().is_empty());
    }
}
