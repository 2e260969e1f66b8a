//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Entry of `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    /// WebSocket endpoint path for this room
    pub path: String,
}

/// Entry of `GET /debug/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveRoomDto {
    pub id: String,
    pub online: usize,
    pub history_len: usize,
}
