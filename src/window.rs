//! Splits a date range into request windows that each fit under the
//! per-request candle cap.

use crate::config::FetchConfig;
use chrono::{DateTime, TimeDelta, Utc};
use std::fmt;

/// Time range for one request. Both bounds are inclusive on the API side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Epoch seconds of `start`, as sent in the query string.
    pub fn start_ts(&self) -> String {
        self.start.timestamp().to_string()
    }

    pub fn end_ts(&self) -> String {
        self.end.timestamp().to_string()
    }

    pub fn width(&self) -> TimeDelta {
        self.end - self.start
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d %H:%M:%S UTC"),
            self.end.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

/// Iterator over the request windows covering `[start, end)`.
///
/// Each window is at most `max_batch` wide and never extends past `end`.
/// The next window starts one granularity step after the previous end, so
/// the cursor always moves forward whatever the API returns.
#[derive(Debug, Clone)]
pub struct WindowPlanner {
    cursor: DateTime<Utc>,
    end: DateTime<Utc>,
    max_batch: TimeDelta,
    step: TimeDelta,
}

impl WindowPlanner {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            cursor: config.start,
            end: config.end,
            max_batch: TimeDelta::minutes(config.max_batch_minutes()),
            step: config.granularity.step(),
        }
    }

    pub fn cursor(&self) -> DateTime<Utc> {
        self.cursor
    }
}

impl Iterator for WindowPlanner {
    type Item = TimeWindow;

    fn next(&mut self) -> Option<TimeWindow> {
        if self.cursor >= self.end {
            return None;
        }

        let mut batch_end = (self.cursor + self.max_batch).min(self.end);
        if batch_end <= self.cursor {
            batch_end = self.end;
        }

        let window = TimeWindow {
            start: self.cursor,
            end: batch_end,
        };
        self.cursor = (batch_end + self.step).min(self.end);
        Some(window)
    }
}
