//! UseCase: ルーム一覧の取得
//!
//! 許可リストをそのまま返す。ライブの状態（接続・履歴）には触れない。

use std::sync::Arc;

use crate::domain::{RoomAllowList, RoomId};

/// ルーム一覧取得のユースケース
pub struct ListRoomsUseCase {
    allow_list: Arc<RoomAllowList>,
}

impl ListRoomsUseCase {
    pub fn new(allow_list: Arc<RoomAllowList>) -> Self {
        Self { allow_list }
    }

    /// 許可リストの順でルーム ID を返す
    pub fn execute(&self) -> Vec<RoomId> {
        self.allow_list.rooms().to_vec()
    }
}
