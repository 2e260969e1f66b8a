//! Time-related utilities with clock abstraction for testability.

use chrono::{DateTime, FixedOffset, Local};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get the current wall-clock time
    fn now(&self) -> DateTime<FixedOffset>;
}

/// System clock implementation (uses the local system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: DateTime<FixedOffset>,
}

impl FixedClock {
    /// Create a new fixed clock with the given time
    pub fn new(fixed_time: DateTime<FixedOffset>) -> Self {
        Self { fixed_time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.fixed_time
    }
}

/// Format a time as `HH:MM` (24-hour, zero padded)
pub fn format_hh_mm(time: &DateTime<FixedOffset>) -> String {
    time.format("%H:%M").to_string()
}
