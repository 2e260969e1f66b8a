//! Domain layer: rooms, connections, messages and the seams the
//! infrastructure layer implements.

pub mod allow_list;
pub mod entity;
pub mod error;
pub mod history;
pub mod message_pusher;
pub mod value_object;

pub use allow_list::{DEFAULT_ROOMS, RoomAllowList};
pub use entity::{ChatMessage, Room, RoomEvent, StatusEvent};
pub use error::{AllowListError, DeliveryError, RoomIdError, UnknownRoomError};
pub use history::{
    DEFAULT_HISTORY_CAPACITY, DEFAULT_REPLAY_WINDOW, HistoryBuffer, MAX_HISTORY_CAPACITY,
};
pub use message_pusher::{
    DEFAULT_OUTBOUND_QUEUE, MAX_OUTBOUND_QUEUE, MessagePusher, PusherChannel,
};
pub use value_object::{ConnectionId, DEFAULT_USERNAME, RoomId, Username};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
