//! UseCase layer.
//!
//! - `connection_manager`: join / leave / broadcast / presence for live rooms
//! - `list_rooms`: the static room list served by the page endpoints

pub mod connection_manager;
pub mod list_rooms;

pub use connection_manager::{ConnectionManager, JoinSummary, RoomPolicy};
pub use list_rooms::ListRoomsUseCase;
