//! ルームレジストリの実装
//!
//! - `inmemory`: HashMap + ルームごとのロックによるインメモリ実装

pub mod inmemory;

pub use inmemory::{InMemoryRoomRegistry, RoomSlot};
