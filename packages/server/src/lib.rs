//! Room-based WebSocket chat relay.
//!
//! Clients join one of a fixed set of rooms, exchange messages broadcast to
//! every member of that room, and receive online-count updates. Recent
//! messages are kept per room in a bounded in-memory history and replayed to
//! newcomers.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
