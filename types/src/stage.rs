//! Forward-only stage machine for the countdown and the celebration that follows.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::countdown::Remaining;

/// Phase of the display. Ordered; the sequencer only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Normal ticking. `final_stretch` switches the view to the ring countdown.
    Counting { final_stretch: bool },
    /// Target reached; the old year is on screen.
    YearShown,
    /// The last year digit is rolling over.
    DigitRolling,
    /// Terminal stage; persists until exit.
    Celebrating,
}

impl Stage {
    fn rank(self) -> u8 {
        match self {
            Stage::Counting {
                final_stretch: false,
            } => 0,
            Stage::Counting {
                final_stretch: true,
            } => 1,
            Stage::YearShown => 2,
            Stage::DigitRolling => 3,
            Stage::Celebrating => 4,
        }
    }

    #[must_use]
    pub fn is_final_stretch(self) -> bool {
        matches!(
            self,
            Stage::Counting {
                final_stretch: true
            }
        )
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Stage::Counting {
                final_stretch: false,
            } => "counting",
            Stage::Counting {
                final_stretch: true,
            } => "final_stretch",
            Stage::YearShown => "year_shown",
            Stage::DigitRolling => "digit_rolling",
            Stage::Celebrating => "celebrating",
        }
    }
}

impl PartialOrd for Stage {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Stage {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// A stage change reported by [`StageSequencer::observe`]; names the stage entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    FinalStretch,
    YearShown,
    DigitRolling,
    Celebrating,
}

impl Transition {
    #[must_use]
    pub fn stage(self) -> Stage {
        match self {
            Transition::FinalStretch => Stage::Counting {
                final_stretch: true,
            },
            Transition::YearShown => Stage::YearShown,
            Transition::DigitRolling => Stage::DigitRolling,
            Transition::Celebrating => Stage::Celebrating,
        }
    }
}

/// Thresholds and one-shot delays driving the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSchedule {
    /// Remaining time at or below which the final stretch starts.
    pub final_stretch: Duration,
    /// Delay from `YearShown` to `DigitRolling`.
    pub year_hold: Duration,
    /// Delay from `DigitRolling` to `Celebrating`.
    pub digit_roll: Duration,
}

impl Default for StageSchedule {
    fn default() -> Self {
        Self {
            final_stretch: Duration::from_secs(10),
            year_hold: Duration::from_millis(1_000),
            digit_roll: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StageSequencer {
    stage: Stage,
    schedule: StageSchedule,
    /// Wall-clock instant at which the target was first observed as reached.
    reached_at: Option<DateTime<Utc>>,
}

impl StageSequencer {
    #[must_use]
    pub fn new(schedule: StageSchedule) -> Self {
        Self {
            stage: Stage::Counting {
                final_stretch: false,
            },
            schedule,
            reached_at: None,
        }
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn schedule(&self) -> StageSchedule {
        self.schedule
    }

    #[must_use]
    pub fn reached_at(&self) -> Option<DateTime<Utc>> {
        self.reached_at
    }

    /// Feed one observation of the countdown; returns the transitions fired, oldest first.
    ///
    /// Several transitions can fire at once when observations arrive late. A wall
    /// clock that steps backwards never undoes a transition.
    pub fn observe(&mut self, remaining: &Remaining, now: DateTime<Utc>) -> Vec<Transition> {
        let mut fired = Vec::new();

        if let Stage::Counting { final_stretch } = self.stage {
            if remaining.is_elapsed() {
                self.reached_at = Some(now);
                self.enter(Transition::YearShown, &mut fired);
            } else if !final_stretch
                && u128::from(remaining.total_millis) <= self.schedule.final_stretch.as_millis()
            {
                self.enter(Transition::FinalStretch, &mut fired);
            }
        }

        let Some(reached_at) = self.reached_at else {
            return fired;
        };
        let since = now
            .signed_duration_since(reached_at)
            .to_std()
            .unwrap_or_default();

        if self.stage == Stage::YearShown && since >= self.schedule.year_hold {
            self.enter(Transition::DigitRolling, &mut fired);
        }
        if self.stage == Stage::DigitRolling
            && since >= self.schedule.year_hold.saturating_add(self.schedule.digit_roll)
        {
            self.enter(Transition::Celebrating, &mut fired);
        }

        fired
    }

    fn enter(&mut self, transition: Transition, fired: &mut Vec<Transition>) {
        let next = transition.stage();
        debug_assert!(next > self.stage, "stage regression {:?} -> {next:?}", self.stage);
        if next > self.stage {
            self.stage = next;
            fired.push(transition);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Stage, StageSchedule, StageSequencer, Transition};
    use crate::countdown::Remaining;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    fn target() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().unwrap()
    }

    fn observe_at(seq: &mut StageSequencer, offset_ms: i64) -> Vec<Transition> {
        let now = target() + TimeDelta::milliseconds(offset_ms);
        seq.observe(&Remaining::between(target(), now), now)
    }

    #[test]
    fn counting_without_final_stretch() {
        let mut seq = StageSequencer::new(StageSchedule::default());
        assert!(observe_at(&mut seq, -60_000).is_empty());
        assert_eq!(
            seq.stage(),
            Stage::Counting {
                final_stretch: false
            }
        );
    }

    #[test]
    fn final_stretch_starts_at_ten_seconds() {
        let mut seq = StageSequencer::new(StageSchedule::default());
        assert!(observe_at(&mut seq, -10_001).is_empty());
        assert_eq!(observe_at(&mut seq, -10_000), vec![Transition::FinalStretch]);
        assert!(seq.stage().is_final_stretch());
        // Stays set, fires once.
        assert!(observe_at(&mut seq, -5_000).is_empty());
        assert!(seq.stage().is_final_stretch());
    }

    #[test]
    fn final_stretch_survives_clock_stepping_back() {
        let mut seq = StageSequencer::new(StageSchedule::default());
        observe_at(&mut seq, -3_000);
        observe_at(&mut seq, -60_000);
        assert!(seq.stage().is_final_stretch());
    }

    #[test]
    fn reaching_target_clears_final_stretch() {
        let mut seq = StageSequencer::new(StageSchedule::default());
        observe_at(&mut seq, -1_000);
        assert_eq!(observe_at(&mut seq, 0), vec![Transition::YearShown]);
        assert_eq!(seq.stage(), Stage::YearShown);
        assert!(!seq.stage().is_final_stretch());
        assert_eq!(seq.reached_at(), Some(target()));
    }

    #[test]
    fn one_shot_delays_follow_year_shown() {
        let mut seq = StageSequencer::new(StageSchedule::default());
        observe_at(&mut seq, 0);
        assert!(observe_at(&mut seq, 999).is_empty());
        assert_eq!(observe_at(&mut seq, 1_000), vec![Transition::DigitRolling]);
        assert!(observe_at(&mut seq, 1_499).is_empty());
        assert_eq!(observe_at(&mut seq, 1_500), vec![Transition::Celebrating]);
        assert_eq!(seq.stage(), Stage::Celebrating);
    }

    #[test]
    fn late_start_celebrates_within_two_and_a_half_seconds() {
        let mut seq = StageSequencer::new(StageSchedule::default());
        // First poll lands 5s after the target.
        assert_eq!(observe_at(&mut seq, 5_000), vec![Transition::YearShown]);
        observe_at(&mut seq, 6_000);
        observe_at(&mut seq, 6_500);
        assert_eq!(seq.stage(), Stage::Celebrating);
    }

    #[test]
    fn late_observation_fires_all_pending_in_order() {
        let mut seq = StageSequencer::new(StageSchedule::default());
        observe_at(&mut seq, 0);
        assert_eq!(
            observe_at(&mut seq, 10_000),
            vec![Transition::DigitRolling, Transition::Celebrating]
        );
    }

    #[test]
    fn celebrating_is_terminal() {
        let mut seq = StageSequencer::new(StageSchedule::default());
        observe_at(&mut seq, 0);
        observe_at(&mut seq, 2_000);
        assert_eq!(seq.stage(), Stage::Celebrating);
        for offset in [-100_000, -1, 0, 50_000] {
            assert!(observe_at(&mut seq, offset).is_empty());
            assert_eq!(seq.stage(), Stage::Celebrating);
        }
    }

    #[test]
    fn backwards_clock_after_target_holds_year_shown() {
        let mut seq = StageSequencer::new(StageSchedule::default());
        observe_at(&mut seq, 0);
        assert!(observe_at(&mut seq, -30_000).is_empty());
        assert_eq!(seq.stage(), Stage::YearShown);
    }

    #[test]
    fn stages_are_ordered() {
        assert!(
            Stage::Counting {
                final_stretch: false
            } < Stage::Counting {
                final_stretch: true
            }
        );
        assert!(Stage::YearShown < Stage::DigitRolling);
        assert!(Stage::DigitRolling < Stage::Celebrating);
    }
}
