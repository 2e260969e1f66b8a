//! Command-line / environment configuration.

use clap::Parser;
use thiserror::Error;

use crate::{
    domain::{
        AllowListError, DEFAULT_HISTORY_CAPACITY, DEFAULT_OUTBOUND_QUEUE, DEFAULT_REPLAY_WINDOW,
        DEFAULT_ROOMS, MAX_HISTORY_CAPACITY, MAX_OUTBOUND_QUEUE, RoomAllowList,
    },
    usecase::RoomPolicy,
};

/// Invalid startup configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid room list: {0}")]
    InvalidRooms(#[from] AllowListError),
    #[error("history limit must be at least 1")]
    ZeroHistoryLimit,
    #[error("history limit ({limit}) must not exceed {max}")]
    HistoryLimitTooLarge { limit: usize, max: usize },
    #[error("replay limit ({replay}) must not exceed history limit ({history})")]
    ReplayExceedsHistory { replay: usize, history: usize },
    #[error("outbound queue ({queue}) must be larger than replay limit ({replay})")]
    OutboundQueueTooSmall { queue: usize, replay: usize },
    #[error("outbound queue ({queue}) must not exceed {max}")]
    OutboundQueueTooLarge { queue: usize, max: usize },
}

#[derive(Parser, Debug, Clone)]
#[command(name = "hiroba-server")]
#[command(about = "Room-based WebSocket chat relay", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "HIROBA_HOST")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value_t = 8080, env = "HIROBA_PORT")]
    pub port: u16,

    /// Rooms clients may join (comma separated)
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = DEFAULT_ROOMS.map(String::from),
        env = "HIROBA_ROOMS"
    )]
    pub rooms: Vec<String>,

    /// Messages kept per room
    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY, env = "HIROBA_HISTORY_LIMIT")]
    pub history_limit: usize,

    /// Messages replayed to a client when it joins
    #[arg(long, default_value_t = DEFAULT_REPLAY_WINDOW, env = "HIROBA_REPLAY_LIMIT")]
    pub replay_limit: usize,

    /// Frames buffered per connection before a slow client is disconnected
    #[arg(long, default_value_t = DEFAULT_OUTBOUND_QUEUE, env = "HIROBA_OUTBOUND_QUEUE")]
    pub outbound_queue: usize,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "debug", env = "HIROBA_LOG_LEVEL")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn allow_list(&self) -> Result<RoomAllowList, ConfigError> {
        let names = self
            .rooms
            .iter()
            .map(|room| room.trim())
            .filter(|room| !room.is_empty());
        Ok(RoomAllowList::from_names(names)?)
    }

    pub fn room_policy(&self) -> Result<RoomPolicy, ConfigError> {
        if self.history_limit == 0 {
            return Err(ConfigError::ZeroHistoryLimit);
        }
        if self.history_limit > MAX_HISTORY_CAPACITY {
            return Err(ConfigError::HistoryLimitTooLarge {
                limit: self.history_limit,
                max: MAX_HISTORY_CAPACITY,
            });
        }
        if self.replay_limit > self.history_limit {
            return Err(ConfigError::ReplayExceedsHistory {
                replay: self.replay_limit,
                history: self.history_limit,
            });
        }
        // Replay plus one status frame must fit in a fresh queue
        if self.outbound_queue <= self.replay_limit {
            return Err(ConfigError::OutboundQueueTooSmall {
                queue: self.outbound_queue,
                replay: self.replay_limit,
            });
        }
        if self.outbound_queue > MAX_OUTBOUND_QUEUE {
            return Err(ConfigError::OutboundQueueTooLarge {
                queue: self.outbound_queue,
                max: MAX_OUTBOUND_QUEUE,
            });
        }
        Ok(RoomPolicy {
            history_capacity: self.history_limit,
            replay_window: self.replay_limit,
            outbound_queue: self.outbound_queue,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ServerConfig {
        let argv = std::iter::once("hiroba-server").chain(args.iter().copied());
        ServerConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        // テスト項目: 引数なしで既定値が使われる
        // given (前提条件):
        let config = parse(&[]);

        // when (操作):
        let allow_list = config.allow_list().unwrap();
        let policy = config.room_policy().unwrap();

        // then (期待する結果):
        assert_eq!(config.port, 8080);
        assert_eq!(allow_list, RoomAllowList::default());
        assert_eq!(policy, RoomPolicy::default());
    }

    #[test]
    fn test_custom_rooms() {
        // テスト項目: カンマ区切りのルーム指定が許可リストになる
        // given (前提条件):
        let config = parse(&["--rooms", "lobby, dev ,ops"]);

        // when (操作):
        let allow_list = config.allow_list().unwrap();

        // then (期待する結果):
        let names: Vec<&str> = allow_list.rooms().iter().map(|r| r.as_str()).collect();
        assert_eq!(names, vec!["lobby", "dev", "ops"]);
    }

    #[test]
    fn test_invalid_rooms_are_rejected() {
        // テスト項目: 不正なルーム名は起動時エラーになる
        // given (前提条件):
        let config = parse(&["--rooms", "ok,no/slash"]);

        // when (操作):
        let result = config.allow_list();

        // then (期待する結果):
        assert!(matches!(result, Err(ConfigError::InvalidRooms(_))));
    }

    #[test]
    fn test_invalid_limits_are_rejected() {
        // テスト項目: 履歴上限 0 や、再送件数 > 履歴上限はエラーになる
        // given (前提条件):
        let zero = parse(&["--history-limit", "0", "--replay-limit", "0"]);
        let too_many = parse(&["--history-limit", "10", "--replay-limit", "20"]);

        // when (操作):
        let zero_result = zero.room_policy();
        let too_many_result = too_many.room_policy();

        // then (期待する結果):
        assert_eq!(zero_result, Err(ConfigError::ZeroHistoryLimit));
        assert_eq!(
            too_many_result,
            Err(ConfigError::ReplayExceedsHistory {
                replay: 20,
                history: 10
            })
        );
    }

    #[test]
    fn test_huge_history_limit_is_rejected() {
        // テスト項目: 上限を超える履歴件数は、ルーム作成前の起動時にエラーになる
        // given (前提条件):
        let huge = parse(&["--history-limit", "18446744073709551615"]);
        let just_over = parse(&["--history-limit", &(MAX_HISTORY_CAPACITY + 1).to_string()]);
        let at_max = parse(&["--history-limit", &MAX_HISTORY_CAPACITY.to_string()]);

        // when (操作):
        let huge_result = huge.room_policy();
        let just_over_result = just_over.room_policy();
        let at_max_result = at_max.room_policy();

        // then (期待する結果):
        assert_eq!(
            huge_result,
            Err(ConfigError::HistoryLimitTooLarge {
                limit: usize::MAX,
                max: MAX_HISTORY_CAPACITY
            })
        );
        assert_eq!(
            just_over_result,
            Err(ConfigError::HistoryLimitTooLarge {
                limit: MAX_HISTORY_CAPACITY + 1,
                max: MAX_HISTORY_CAPACITY
            })
        );
        assert_eq!(at_max_result.unwrap().history_capacity, MAX_HISTORY_CAPACITY);
    }

    #[test]
    fn test_outbound_queue_must_hold_replay() {
        // テスト項目: 送信キューは再送件数より大きく、上限以下でなければならない
        // given (前提条件):
        let too_small = parse(&["--replay-limit", "50", "--outbound-queue", "50"]);
        let too_large = parse(&["--outbound-queue", &(MAX_OUTBOUND_QUEUE + 1).to_string()]);
        let fits = parse(&["--replay-limit", "50", "--outbound-queue", "51"]);

        // when (操作):
        let too_small_result = too_small.room_policy();
        let too_large_result = too_large.room_policy();
        let fits_result = fits.room_policy();

        // then (期待する結果):
        assert_eq!(
            too_small_result,
            Err(ConfigError::OutboundQueueTooSmall {
                queue: 50,
                replay: 50
            })
        );
        assert_eq!(
            too_large_result,
            Err(ConfigError::OutboundQueueTooLarge {
                queue: MAX_OUTBOUND_QUEUE + 1,
                max: MAX_OUTBOUND_QUEUE
            })
        );
        assert_eq!(fits_result.unwrap().outbound_queue, 51);
    }
}
