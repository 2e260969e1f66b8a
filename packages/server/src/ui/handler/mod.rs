//! Request handlers.

pub mod http;
pub mod websocket;

pub use http::{debug_rooms, get_rooms, health_check, index};
pub use websocket::websocket_handler;
