//! Repeating fireworks show started once the target is reached.

use std::time::Duration;

use midnight_types::{BurstSink, BurstSpec, Origin};

use crate::particles::Jitter;

const LEFT_BAND: (f32, f32) = (0.1, 0.3);
const RIGHT_BAND: (f32, f32) = (0.7, 0.9);
/// Bursts due in a single advance beyond this are skipped, not replayed.
const MAX_CATCHUP: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireworksSettings {
    pub interval: Duration,
    /// Particles per burst at full strength.
    pub particles: u32,
    /// Show length; the burst size decays linearly to zero across it.
    /// `None` keeps bursting at full strength until the app exits.
    pub duration: Option<Duration>,
}

impl Default for FireworksSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(250),
            particles: 50,
            duration: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FireworksLoop {
    settings: FireworksSettings,
    elapsed: Duration,
    next_at: Duration,
    finished: bool,
}

impl FireworksLoop {
    #[must_use]
    pub fn new(settings: FireworksSettings) -> Self {
        let settings = FireworksSettings {
            interval: settings.interval.max(Duration::from_millis(1)),
            ..settings
        };
        Self {
            next_at: settings.interval,
            settings,
            elapsed: Duration::ZERO,
            finished: false,
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance the show clock, firing a left and a right burst for every interval
    /// crossed. Returns the number of bursts fired.
    pub fn advance(
        &mut self,
        delta: Duration,
        jitter: &mut dyn Jitter,
        sink: &mut dyn BurstSink,
    ) -> u32 {
        if self.finished {
            return 0;
        }
        self.elapsed = self.elapsed.saturating_add(delta);

        let mut fired = 0;
        let mut rounds = 0;
        while self.elapsed >= self.next_at {
            let Some(count) = self.particles_at(self.next_at) else {
                self.finished = true;
                tracing::debug!(elapsed = ?self.elapsed, "fireworks show ended");
                break;
            };
            self.next_at = self.next_at.saturating_add(self.settings.interval);

            rounds += 1;
            if rounds > MAX_CATCHUP {
                continue;
            }
            for (min, max) in [LEFT_BAND, RIGHT_BAND] {
                let origin = Origin {
                    x: jitter.range(min, max),
                    y: jitter.unit() - 0.2,
                };
                sink.burst(&BurstSpec::firework(origin, count));
                fired += 1;
            }
        }
        fired
    }

    /// Burst size for a burst due at `at`, or `None` once the show is over.
    fn particles_at(&self, at: Duration) -> Option<u32> {
        let Some(duration) = self.settings.duration else {
            return Some(self.settings.particles);
        };
        let left = duration.checked_sub(at).filter(|left| !left.is_zero())?;
        let fraction = left.as_secs_f32() / duration.as_secs_f32();
        Some((self.settings.particles as f32 * fraction).round() as u32)
    }
}
