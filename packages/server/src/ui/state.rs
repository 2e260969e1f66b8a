//! Server state shared by all handlers.

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::{
    domain::RoomAllowList,
    usecase::{ConnectionManager, ListRoomsUseCase},
};

/// Shared application state
pub struct AppState {
    /// Room allow-list, fixed at startup
    pub allow_list: Arc<RoomAllowList>,
    /// ConnectionManager（参加・退出・ブロードキャスト）
    pub connection_manager: Arc<ConnectionManager>,
    /// ListRoomsUseCase（ルーム一覧取得のユースケース）
    pub list_rooms_usecase: Arc<ListRoomsUseCase>,
    /// Clock used to stamp inbound messages
    pub clock: Arc<dyn Clock>,
}
