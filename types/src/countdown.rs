//! Remaining-time arithmetic for a fixed target instant.

use chrono::{DateTime, Utc};

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: u64 = 24 * MILLIS_PER_HOUR;

/// Calendar breakdown of the time left until the target.
///
/// Recomputed from `target - now` on every poll, never updated incrementally.
/// Once the target has passed every field is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Remaining {
    pub days: u64,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub total_millis: u64,
}

/// One column of the countdown grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 4] = [
        TimeUnit::Days,
        TimeUnit::Hours,
        TimeUnit::Minutes,
        TimeUnit::Seconds,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            TimeUnit::Days => "Days",
            TimeUnit::Hours => "Hours",
            TimeUnit::Minutes => "Minutes",
            TimeUnit::Seconds => "Seconds",
        }
    }
}

impl Remaining {
    pub const ZERO: Remaining = Remaining {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        total_millis: 0,
    };

    #[must_use]
    pub fn between(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self::from_millis(target.signed_duration_since(now).num_milliseconds())
    }

    /// Breakdown of a signed millisecond difference; non-positive input clamps to zero.
    #[must_use]
    pub fn from_millis(millis: i64) -> Self {
        if millis <= 0 {
            return Self::ZERO;
        }
        let total = millis as u64;
        Self {
            days: total / MILLIS_PER_DAY,
            hours: ((total / MILLIS_PER_HOUR) % 24) as u8,
            minutes: ((total / MILLIS_PER_MINUTE) % 60) as u8,
            seconds: ((total / MILLIS_PER_SECOND) % 60) as u8,
            total_millis: total,
        }
    }

    #[must_use]
    pub fn is_elapsed(&self) -> bool {
        self.total_millis == 0
    }

    /// Whole seconds left, i.e. `floor(total_millis / 1000)`.
    #[must_use]
    pub fn whole_seconds(&self) -> u64 {
        self.total_millis / MILLIS_PER_SECOND
    }

    #[must_use]
    pub fn get(&self, unit: TimeUnit) -> u64 {
        match unit {
            TimeUnit::Days => self.days,
            TimeUnit::Hours => u64::from(self.hours),
            TimeUnit::Minutes => u64::from(self.minutes),
            TimeUnit::Seconds => u64::from(self.seconds),
        }
    }

    /// Zero-padded to two digits; days may run wider.
    #[must_use]
    pub fn padded(&self, unit: TimeUnit) -> String {
        format!("{:02}", self.get(unit))
    }
}
