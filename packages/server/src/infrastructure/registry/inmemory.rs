//! InMemory Room Registry 実装
//!
//! 許可リストの各ルームに対して、起動時にロック付きのスロットを 1 つずつ用意する。
//! スロットの中身は `Option<Room>` で、`None` は「ルームが存在しない」状態を表す。
//!
//! ```text
//! "general" -> Mutex<Option<Room>>   // 参加者がいれば Some
//! "games"   -> Mutex<Option<Room>>
//! "random"  -> Mutex<Option<Room>>
//! ```
//!
//! マップ自体は起動後に変化しないため外側のロックは不要で、
//! 異なるルームの操作が互いをブロックすることはない。

use std::collections::HashMap;

use tokio::sync::{Mutex, MutexGuard};

use crate::domain::{Room, RoomAllowList, RoomId, UnknownRoomError};

/// ロック中のルームスロット
pub type RoomSlot<'a> = MutexGuard<'a, Option<Room>>;

/// インメモリ Room Registry 実装
pub struct InMemoryRoomRegistry {
    rooms: HashMap<RoomId, Mutex<Option<Room>>>,
    history_capacity: usize,
}

impl InMemoryRoomRegistry {
    /// 許可リストの全ルーム分のスロットを持つレジストリを作成
    pub fn new(allow_list: &RoomAllowList, history_capacity: usize) -> Self {
        let rooms = allow_list
            .rooms()
            .iter()
            .map(|room_id| (room_id.clone(), Mutex::new(None)))
            .collect();
        Self {
            rooms,
            history_capacity,
        }
    }

    /// ルームのスロットをロックする
    ///
    /// ガードを保持している間、同じルームへの他の操作は待たされる。
    pub async fn lock(&self, room_id: &RoomId) -> Result<RoomSlot<'_>, UnknownRoomError> {
        let slot = self
            .rooms
            .get(room_id)
            .ok_or_else(|| UnknownRoomError(room_id.as_str().to_string()))?;
        Ok(slot.lock().await)
    }

    /// ルームが存在しなければ作成して返す
    pub fn open<'s>(&self, slot: &'s mut RoomSlot<'_>, room_id: &RoomId) -> &'s mut Room {
        slot.get_or_insert_with(|| Room::new(room_id.clone(), self.history_capacity))
    }

    /// 存在するルームのコピーを ID 順で返す
    pub async fn snapshot(&self) -> Vec<Room> {
        let mut room_ids: Vec<&RoomId> = self.rooms.keys().collect();
        room_ids.sort();

        let mut rooms = Vec::new();
        for room_id in room_ids {
            if let Some(slot) = self.rooms.get(room_id) {
                if let Some(room) = slot.lock().await.as_ref() {
                    rooms.push(room.clone());
                }
            }
        }
        rooms
    }
}
