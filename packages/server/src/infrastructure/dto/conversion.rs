//! Conversion logic between DTOs and domain entities.

use chrono::{DateTime, FixedOffset};
use hiroba_shared::time::format_hh_mm;

use crate::domain::{ChatMessage, Room, RoomEvent, RoomId, StatusEvent, Username};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// DTO → Domain Entity
// ========================================

impl dto::InboundFrame {
    /// Build the chat message this frame represents in `room`
    pub fn into_message(self, room: RoomId, sent_at: DateTime<FixedOffset>) -> ChatMessage {
        ChatMessage::new(
            room,
            Username::new(self.username),
            self.text.unwrap_or_default(),
            sent_at,
        )
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&ChatMessage> for dto::OutboundFrame {
    fn from(message: &ChatMessage) -> Self {
        Self::Message {
            room: message.room.as_str().to_string(),
            username: message.username.as_str().to_string(),
            text: message.text.clone(),
            time: format_hh_mm(&message.sent_at),
        }
    }
}

impl From<&StatusEvent> for dto::OutboundFrame {
    fn from(status: &StatusEvent) -> Self {
        Self::Status {
            room: status.room.as_str().to_string(),
            online: status.online,
        }
    }
}

impl From<&RoomEvent> for dto::OutboundFrame {
    fn from(event: &RoomEvent) -> Self {
        match event {
            RoomEvent::Message(message) => message.into(),
            RoomEvent::Status(status) => status.into(),
        }
    }
}

impl From<&RoomId> for http::RoomSummaryDto {
    fn from(room_id: &RoomId) -> Self {
        Self {
            id: room_id.as_str().to_string(),
            path: format!("/ws/{}", room_id.as_str()),
        }
    }
}

impl From<&Room> for http::LiveRoomDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            online: room.online(),
            history_len: room.history().len(),
        }
    }
}
