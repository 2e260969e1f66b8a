//! ルームごとのメッセージ履歴

use std::collections::VecDeque;

use super::entity::ChatMessage;

/// 1 ルームあたりに保持する履歴の既定件数
pub const DEFAULT_HISTORY_CAPACITY: usize = 200;

/// 参加直後に再送する履歴の既定件数
pub const DEFAULT_REPLAY_WINDOW: usize = 50;

/// 設定で指定できる履歴件数の上限
pub const MAX_HISTORY_CAPACITY: usize = 10_000;

/// 上限付きのメッセージ履歴
///
/// 追加のたびに上限を超えた分を古い順に捨てるため、`len()` は常に上限以下。
/// 領域は追加に合わせて確保し、上限分を先取りしない。
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    entries: VecDeque<ChatMessage>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.entries.push_back(message);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// 直近 `window` 件を古い順に返す
    pub fn recent(&self, window: usize) -> Vec<ChatMessage> {
        let skip = self.entries.len().saturating_sub(window);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RoomId, Username};
    use chrono::DateTime;

    fn message(text: &str) -> ChatMessage {
        ChatMessage::new(
            RoomId::new("general").unwrap(),
            Username::new(Some("alice".to_string())),
            text.to_string(),
            DateTime::parse_from_rfc3339("2024-05-01T12:00:00+09:00").unwrap(),
        )
    }

    fn texts(messages: &[ChatMessage]) -> Vec<String> {
        messages.iter().map(|m| m.text.clone()).collect()
    }

    #[test]
    fn test_push_keeps_order() {
        // テスト項目: 追加した順に履歴が保持される
        // given (前提条件):
        let mut history = HistoryBuffer::new(10);

        // when (操作):
        history.push(message("one"));
        history.push(message("two"));
        history.push(message("three"));

        // then (期待する結果):
        assert_eq!(history.len(), 3);
        assert_eq!(texts(&history.recent(10)), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_huge_capacity_does_not_preallocate() {
        // テスト項目: 巨大な上限を指定しても生成時に領域を確保せず、追加もできる
        // given (前提条件):
        let mut history = HistoryBuffer::new(usize::MAX);

        // when (操作):
        history.push(message("one"));

        // then (期待する結果):
        assert_eq!(history.len(), 1);
        assert_eq!(texts(&history.recent(DEFAULT_REPLAY_WINDOW)), vec!["one"]);
    }

    #[test]
    fn test_push_evicts_oldest_beyond_capacity() {
        // テスト項目: 上限を超えると古いものから捨てられる
        // given (前提条件):
        let mut history = HistoryBuffer::new(DEFAULT_HISTORY_CAPACITY);

        // when (操作):
        for i in 0..(DEFAULT_HISTORY_CAPACITY + 25) {
            history.push(message(&i.to_string()));
            assert!(history.len() <= DEFAULT_HISTORY_CAPACITY);
        }

        // then (期待する結果): 最新 200 件（25..225）が残る
        assert_eq!(history.len(), DEFAULT_HISTORY_CAPACITY);
        let kept = history.recent(DEFAULT_HISTORY_CAPACITY);
        assert_eq!(kept.first().unwrap().text, "25");
        assert_eq!(
            kept.last().unwrap().text,
            (DEFAULT_HISTORY_CAPACITY + 24).to_string()
        );
    }

    #[test]
    fn test_recent_returns_last_window_in_chronological_order() {
        // テスト項目: recent は直近 window 件を古い順で返す
        // given (前提条件):
        let mut history = HistoryBuffer::default();
        for i in 0..120 {
            history.push(message(&i.to_string()));
        }

        // when (操作):
        let replay = history.recent(DEFAULT_REPLAY_WINDOW);

        // then (期待する結果):
        let expected: Vec<String> = (70..120).map(|i| i.to_string()).collect();
        assert_eq!(texts(&replay), expected);
    }

    #[test]
    fn test_recent_with_fewer_entries_than_window() {
        // テスト項目: 履歴が window より少ない場合は全件を返す
        // given (前提条件):
        let mut history = HistoryBuffer::default();
        history.push(message("a"));
        history.push(message("b"));

        // when (操作):
        let replay = history.recent(DEFAULT_REPLAY_WINDOW);

        // then (期待する結果):
        assert_eq!(texts(&replay), vec!["a", "b"]);
    }

    #[test]
    fn test_recent_on_empty_history() {
        // テスト項目: 空の履歴からは何も返らない
        // given (前提条件):
        let history = HistoryBuffer::default();

        // when (操作):
        let replay = history.recent(DEFAULT_REPLAY_WINDOW);

        // then (期待する結果):
        assert!(replay.is_empty());
        assert!(history.is_empty());
    }
}
