//! Infrastructure layer: wire formats, connection fan-out and in-memory storage.

pub mod dto;
pub mod message_pusher;
pub mod registry;
