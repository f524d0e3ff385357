//! Timed effects played during the celebration stages.

use std::time::Duration;

use super::animation::{AnimPhase, EffectTimer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CelebrationEffectKind {
    /// Last year digit scrolls out while the new digit scrolls in.
    DigitRoll,
    /// Banner brightness oscillates; loops forever.
    BannerPulse,
}

#[derive(Debug, Clone)]
pub struct CelebrationEffect {
    kind: CelebrationEffectKind,
    timer: EffectTimer,
    period: Duration,
}

impl CelebrationEffect {
    #[must_use]
    pub fn digit_roll(duration: Duration) -> Self {
        Self {
            kind: CelebrationEffectKind::DigitRoll,
            timer: EffectTimer::new(duration),
            period: duration,
        }
    }

    /// A pulse that never completes; `phase` reports progress within the current period.
    #[must_use]
    pub fn banner_pulse(period: Duration) -> Self {
        Self {
            kind: CelebrationEffectKind::BannerPulse,
            timer: EffectTimer::new(Duration::MAX),
            period,
        }
    }

    pub fn advance(&mut self, delta: Duration) {
        self.timer.advance(delta);
    }

    #[must_use]
    pub fn phase(&self) -> AnimPhase {
        match self.kind {
            CelebrationEffectKind::DigitRoll => self.timer.phase(),
            CelebrationEffectKind::BannerPulse => {
                if self.period.is_zero() {
                    return AnimPhase::Running { progress: 0.0 };
                }
                let period = self.period.as_millis();
                let within = self.timer.elapsed().as_millis() % period;
                AnimPhase::Running {
                    progress: within as f32 / period as f32,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AnimPhase, CelebrationEffect};
    use std::time::Duration;

    #[test]
    fn digit_roll_initial_state() {
        let effect = CelebrationEffect::digit_roll(Duration::from_millis(500));
        assert!(matches!(effect.phase(), AnimPhase::Running { progress } if progress < 0.1));
    }

    #[test]
    fn digit_roll_completes() {
        let mut effect = CelebrationEffect::digit_roll(Duration::from_millis(500));
        effect.advance(Duration::from_millis(600));
        assert_eq!(effect.phase(), AnimPhase::Completed);
    }

    #[test]
    fn banner_pulse_wraps_each_period() {
        let mut effect = CelebrationEffect::banner_pulse(Duration::from_millis(1000));
        effect.advance(Duration::from_millis(2250));
        assert!(
            matches!(effect.phase(), AnimPhase::Running { progress } if (progress - 0.25).abs() < 1e-4)
        );
    }

    #[test]
    fn banner_pulse_never_completes() {
        let mut effect = CelebrationEffect::banner_pulse(Duration::from_millis(100));
        effect.advance(Duration::from_secs(3600));
        assert!(matches!(effect.phase(), AnimPhase::Running { .. }));
    }
}
