//! Search limits and the wall-clock budget for one move.
//!
//! The budget is only ever consulted between iterative-deepening depths.
//! A depth that has started always runs to completion, so there is no stop
//! flag to share with the search itself.

use std::time::{Duration, Instant};

/// Depth and time limits for a single search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Deepest iteration to run, in plies (half-moves)
    pub depth: u8,
    /// Wall-clock budget for this move (None = no budget)
    pub move_time: Option<Duration>,
}

impl SearchLimits {
    /// Create limits with only depth constraint (no time limit).
    pub fn depth(depth: u8) -> Self {
        Self {
            depth,
            move_time: None,
        }
    }

    /// Create limits with both depth and time constraints.
    pub fn depth_and_time(depth: u8, move_time: Duration) -> Self {
        Self {
            depth,
            move_time: Some(move_time),
        }
    }

    /// Start the clock for this search.
    pub fn start(&self) -> Deadline {
        Deadline::new(self.move_time)
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::depth_and_time(5, Duration::from_secs(60))
    }
}

/// A started clock with an optional budget, read from a monotonic source.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    pub fn new(limit: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    /// True once the budget has been used up. Never true without a budget.
    pub fn expired(&self) -> bool {
        self.limit.is_some_and(|limit| self.elapsed() >= limit)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
