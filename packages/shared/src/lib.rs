//! Utilities shared between Hiroba binaries and libraries.

pub mod logger;
pub mod time;
