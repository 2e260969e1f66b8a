//! Value Objects
//!
//! 不変で、値によって同一性が決まるドメインの基本型。

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use super::error::RoomIdError;

/// RoomId の最大文字数
pub const ROOM_ID_MAX_LEN: usize = 64;

/// username が省略・空文字の場合に使われる表示名
pub const DEFAULT_USERNAME: &str = "Anonymous";

/// ルーム識別子
///
/// URL パスに埋め込まれるため、英数字・`-`・`_` のみを許可する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: impl Into<String>) -> Result<Self, RoomIdError> {
        let value = value.into();
        if value.is_empty() {
            return Err(RoomIdError::Empty);
        }
        let len = value.chars().count();
        if len > ROOM_ID_MAX_LEN {
            return Err(RoomIdError::TooLong(len));
        }
        if let Some(c) = value
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(RoomIdError::InvalidCharacter(c));
        }
        Ok(Self(value))
    }

    /// 既知の正しい値から生成する（組み込みの既定ルーム用）
    pub(crate) fn from_static(value: &'static str) -> Self {
        debug_assert!(Self::new(value).is_ok(), "invalid built-in room id: {value}");
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 接続識別子
///
/// 1 つの WebSocket 接続に対してサーバー側で採番される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 表示名
///
/// 未指定・空文字は [`DEFAULT_USERNAME`] になる。内容のサニタイズは行わない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn new(value: Option<String>) -> Self {
        match value {
            Some(name) if !name.is_empty() => Self(name),
            _ => Self::anonymous(),
        }
    }

    pub fn anonymous() -> Self {
        Self(DEFAULT_USERNAME.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
