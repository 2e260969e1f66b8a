//! 参加可能なルームの許可リスト
//!
//! 起動時に一度だけ構築され、以降は読み取り専用で共有される。

use super::{
    error::{AllowListError, UnknownRoomError},
    value_object::RoomId,
};

/// 既定のルーム
pub const DEFAULT_ROOMS: [&str; 3] = ["general", "games", "random"];

/// ルームの許可リスト（表示順を保持する）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomAllowList {
    rooms: Vec<RoomId>,
}

impl RoomAllowList {
    /// 名前のリストから許可リストを作る
    ///
    /// 重複は最初の出現だけが残る。空のリストや不正な ID はエラー。
    pub fn from_names<I, S>(names: I) -> Result<Self, AllowListError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rooms: Vec<RoomId> = Vec::new();
        for name in names {
            let name = name.into();
            let room_id = RoomId::new(name.clone())
                .map_err(|source| AllowListError::InvalidRoomId { name, source })?;
            if !rooms.contains(&room_id) {
                rooms.push(room_id);
            }
        }

        if rooms.is_empty() {
            return Err(AllowListError::Empty);
        }
        Ok(Self { rooms })
    }

    /// 要求されたルーム名を許可リストと照合する
    pub fn resolve(&self, name: &str) -> Result<RoomId, UnknownRoomError> {
        self.rooms
            .iter()
            .find(|room| room.as_str() == name)
            .cloned()
            .ok_or_else(|| UnknownRoomError(name.to_string()))
    }

    pub fn rooms(&self) -> &[RoomId] {
        &self.rooms
    }
}

impl Default for RoomAllowList {
    fn default() -> Self {
        Self {
            rooms: DEFAULT_ROOMS.into_iter().map(RoomId::from_static).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RoomIdError;

    #[test]
    fn test_default_allow_list() {
        // テスト項目: 既定の許可リストは general, games, random の順
        // given (前提条件):

        // when (操作):
        let allow_list = RoomAllowList::default();

        // then (期待する結果):
        let names: Vec<&str> = allow_list.rooms().iter().map(|r| r.as_str()).collect();
        assert_eq!(names, vec!["general", "games", "random"]);
    }

    #[test]
    fn test_resolve_known_room() {
        // テスト項目: 許可リストにあるルームは RoomId に解決される
        // given (前提条件):
        let allow_list = RoomAllowList::default();

        // when (操作):
        let result = allow_list.resolve("games");

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "games");
    }

    #[test]
    fn test_resolve_unknown_room() {
        // テスト項目: 許可リストにないルームは UnknownRoomError になる
        // given (前提条件):
        let allow_list = RoomAllowList::default();

        // when (操作):
        let vip = allow_list.resolve("vip");
        let traversal = allow_list.resolve("../general");

        // then (期待する結果):
        assert_eq!(vip, Err(UnknownRoomError("vip".to_string())));
        assert!(traversal.is_err());
    }

    #[test]
    fn test_from_names_deduplicates() {
        // テスト項目: 重複したルーム名は 1 つにまとめられる
        // given (前提条件):
        let names = ["lobby", "dev", "lobby"];

        // when (操作):
        let allow_list = RoomAllowList::from_names(names).unwrap();

        // then (期待する結果):
        let names: Vec<&str> = allow_list.rooms().iter().map(|r| r.as_str()).collect();
        assert_eq!(names, vec!["lobby", "dev"]);
    }

    #[test]
    fn test_from_names_rejects_empty_and_invalid() {
        // テスト項目: 空のリスト・不正な ID を含むリストはエラーになる
        // given (前提条件):
        let empty: Vec<String> = vec![];

        // when (操作):
        let empty_result = RoomAllowList::from_names(empty);
        let invalid_result = RoomAllowList::from_names(["ok", "not ok"]);

        // then (期待する結果):
        assert_eq!(empty_result, Err(AllowListError::Empty));
        assert_eq!(
            invalid_result,
            Err(AllowListError::InvalidRoomId {
                name: "not ok".to_string(),
                source: RoomIdError::InvalidCharacter(' '),
            })
        );
    }
}
