//! WebSocket frame DTOs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inbound frame could not be decoded as a JSON object of the expected shape
#[derive(Debug, Error)]
#[error("failed to decode inbound frame: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// Client → server frame
///
/// Both fields are optional; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InboundFrame {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl InboundFrame {
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Server → client frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundFrame {
    Message {
        room: String,
        username: String,
        text: String,
        /// `HH:MM`
        time: String,
    },
    Status {
        room: String,
        online: usize,
    },
}

impl OutboundFrame {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
