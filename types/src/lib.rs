//! Core domain types for midnight.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

mod burst;
mod countdown;
mod stage;
pub mod ui;

pub use burst::{BurstSink, BurstSpec, GOLD_PALETTE, Origin, Rgb};
pub use countdown::{Remaining, TimeUnit};
pub use stage::{Stage, StageSchedule, StageSequencer, Transition};

use chrono::{DateTime, Datelike, Local, Utc};

/// Old and new year shown around the roll-over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearLabels {
    pub previous: i32,
    pub next: i32,
}

impl YearLabels {
    #[must_use]
    pub fn new(next: i32) -> Self {
        Self {
            previous: next.saturating_sub(1),
            next,
        }
    }

    /// The year being celebrated: the target's local year, or the following year
    /// when the target falls in December (a test run on Christmas Eve still
    /// celebrates the coming year).
    #[must_use]
    pub fn for_target(target: DateTime<Utc>) -> Self {
        let local = target.with_timezone(&Local);
        let year = if local.month() == 12 {
            local.year().saturating_add(1)
        } else {
            local.year()
        };
        Self::new(year)
    }
}

#[cfg(test)]
mod tests {
    use super::YearLabels;

    #[test]
    fn previous_is_one_less() {
        let labels = YearLabels::new(2026);
        assert_eq!(labels.previous, 2025);
        assert_eq!(labels.next, 2026);
    }
}
