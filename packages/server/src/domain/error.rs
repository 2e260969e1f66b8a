//! ドメイン層のエラー定義

use thiserror::Error;

/// RoomId のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomIdError {
    #[error("room id must not be empty")]
    Empty,
    #[error("room id is too long ({0} characters)")]
    TooLong(usize),
    #[error("room id contains an invalid character: {0:?}")]
    InvalidCharacter(char),
}

/// 許可リストにないルームへの参加要求
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown room: '{0}'")]
pub struct UnknownRoomError(pub String);

/// 許可リストの構築エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllowListError {
    #[error("room allow-list must contain at least one room")]
    Empty,
    #[error("invalid room id '{name}': {source}")]
    InvalidRoomId {
        name: String,
        #[source]
        source: RoomIdError,
    },
}

/// 接続へのメッセージ配送エラー
///
/// 配送エラーは常にその接続に閉じる。他の接続への配送は継続される。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("connection not found: {0}")]
    ConnectionNotFound(String),
    #[error("connection channel closed: {0}")]
    ChannelClosed(String),
    #[error("outbound queue is full, dropping slow connection: {0}")]
    QueueFull(String),
}
