//! Core engine for midnight - countdown polling, stage sequencing and effects.
//!
//! This crate contains the App state machine without TUI dependencies. The
//! caller drives it with [`App::tick`] once per frame, passing the wall clock.

mod fireworks;
mod media;
mod particles;
mod settings;

use std::time::Duration;

use chrono::{DateTime, Utc};

pub use fireworks::{FireworksLoop, FireworksSettings};
pub use media::{Backdrop, MediaDeck, MediaError, MediaSink, Silence, TerminalBell};
pub use midnight_config::{ConfigError, MidnightConfig};
pub use midnight_types::{
    Remaining, Rgb, Stage, StageSchedule, StageSequencer, TimeUnit, Transition, YearLabels,
    ui::{AnimPhase, CelebrationEffect, UiOptions},
};
pub use particles::{Jitter, Particle, ParticleField, ThreadJitter};
pub use settings::{Overrides, Settings};

/// Cadence of the countdown poll while counting.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Upper bound on the animation step taken from one frame, so a suspended
/// process does not dump seconds of simulation into a single frame.
const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);
const BANNER_PULSE_PERIOD: Duration = Duration::from_millis(1_600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollTimer {
    /// Recurring poll; next observation due at the given instant.
    Active { due: DateTime<Utc> },
    /// Target reached. One-shot delays are checked every frame instead.
    Cancelled,
}

#[derive(Debug)]
pub struct App {
    target: DateTime<Utc>,
    years: YearLabels,
    ui_options: UiOptions,
    fireworks_settings: FireworksSettings,
    remaining: Remaining,
    sequencer: StageSequencer,
    poll: PollTimer,
    last_tick: DateTime<Utc>,
    frame: u64,
    fireworks: Option<FireworksLoop>,
    particles: ParticleField,
    origin_jitter: ThreadJitter,
    media: MediaDeck,
    digit_roll: Option<CelebrationEffect>,
    banner_pulse: Option<CelebrationEffect>,
    should_quit: bool,
}

impl App {
    /// Build an app whose audio rings the terminal bell (or stays silent when
    /// the chime is disabled).
    #[must_use]
    pub fn new(settings: Settings, now: DateTime<Utc>) -> Self {
        let audio: Box<dyn MediaSink> = if settings.chime {
            Box::new(TerminalBell::stdout())
        } else {
            Box::new(Silence)
        };
        Self::with_audio(settings, now, audio)
    }

    #[must_use]
    pub fn with_audio(settings: Settings, now: DateTime<Utc>, audio: Box<dyn MediaSink>) -> Self {
        tracing::info!(
            target_at = %settings.target,
            year = settings.years.next,
            "Countdown armed"
        );
        Self {
            target: settings.target,
            years: settings.years,
            ui_options: settings.ui,
            fireworks_settings: settings.fireworks,
            // Shown before the first poll lands.
            remaining: Remaining::between(settings.target, now),
            sequencer: StageSequencer::new(settings.schedule),
            poll: PollTimer::Active { due: now },
            last_tick: now,
            frame: 0,
            fireworks: None,
            particles: ParticleField::default(),
            origin_jitter: ThreadJitter,
            media: MediaDeck::new(audio),
            digit_roll: None,
            banner_pulse: None,
            should_quit: false,
        }
    }

    /// Advance to `now`: poll the countdown when due, fire stage transitions,
    /// and step animations by the time since the previous tick.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        let delta = now
            .signed_duration_since(self.last_tick)
            .to_std()
            .unwrap_or_default()
            .min(MAX_FRAME_DELTA);
        self.last_tick = now;
        self.frame = self.frame.wrapping_add(1);

        // Effects started by this tick's transitions begin from zero.
        self.advance_effects(delta);

        match self.poll {
            PollTimer::Active { due } => {
                // A clock stepped back by more than one interval re-polls at once.
                let stepped_back = due
                    .signed_duration_since(now)
                    .to_std()
                    .is_ok_and(|ahead| ahead > POLL_INTERVAL);
                if now >= due || stepped_back {
                    self.poll_countdown(now);
                }
            }
            PollTimer::Cancelled => {
                let fired = self.sequencer.observe(&Remaining::ZERO, now);
                self.apply(&fired);
            }
        }
    }

    fn poll_countdown(&mut self, now: DateTime<Utc>) {
        self.remaining = Remaining::between(self.target, now);
        let fired = self.sequencer.observe(&self.remaining, now);

        self.poll = if self.remaining.is_elapsed() {
            tracing::debug!("Target reached; poll timer cancelled");
            PollTimer::Cancelled
        } else {
            PollTimer::Active {
                due: now + POLL_INTERVAL,
            }
        };

        self.apply(&fired);
    }

    fn apply(&mut self, fired: &[Transition]) {
        for transition in fired {
            tracing::info!(stage = transition.stage().name(), "Stage transition");
            match transition {
                Transition::FinalStretch => {}
                Transition::YearShown => {
                    self.media.swap_to_celebration();
                    if !self.ui_options.reduced_motion {
                        self.fireworks = Some(FireworksLoop::new(self.fireworks_settings));
                    }
                }
                Transition::DigitRolling => {
                    if !self.ui_options.reduced_motion {
                        self.digit_roll = Some(CelebrationEffect::digit_roll(
                            self.sequencer.schedule().digit_roll,
                        ));
                    }
                }
                Transition::Celebrating => {
                    self.digit_roll = None;
                    if !self.ui_options.reduced_motion {
                        self.banner_pulse = Some(CelebrationEffect::banner_pulse(BANNER_PULSE_PERIOD));
                    }
                }
            }
        }
    }

    fn advance_effects(&mut self, delta: Duration) {
        if let Some(show) = self.fireworks.as_mut() {
            show.advance(delta, &mut self.origin_jitter, &mut self.particles);
            if show.is_finished() {
                self.fireworks = None;
            }
        }
        self.particles.step(delta);
        self.media.advance(delta);
        if let Some(effect) = self.digit_roll.as_mut() {
            effect.advance(delta);
        }
        if let Some(effect) = self.banner_pulse.as_mut() {
            effect.advance(delta);
        }
    }

    #[must_use]
    pub fn remaining(&self) -> Remaining {
        self.remaining
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.sequencer.stage()
    }

    #[must_use]
    pub fn target(&self) -> DateTime<Utc> {
        self.target
    }

    #[must_use]
    pub fn years(&self) -> YearLabels {
        self.years
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.ui_options
    }

    /// Frames ticked so far; drives spinners and ring rotation.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[must_use]
    pub fn is_polling(&self) -> bool {
        matches!(self.poll, PollTimer::Active { .. })
    }

    #[must_use]
    pub fn fireworks_running(&self) -> bool {
        self.fireworks.is_some()
    }

    #[must_use]
    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    #[must_use]
    pub fn backdrop(&self) -> &Backdrop {
        self.media.backdrop()
    }

    /// Progress of the year digit roll; `None` outside `DigitRolling` or with
    /// reduced motion.
    #[must_use]
    pub fn digit_roll_phase(&self) -> Option<AnimPhase> {
        self.digit_roll.as_ref().map(CelebrationEffect::phase)
    }

    #[must_use]
    pub fn banner_phase(&self) -> Option<AnimPhase> {
        self.banner_pulse.as_ref().map(CelebrationEffect::phase)
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    /// Release media and stop the show. Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.media.release();
        self.fireworks = None;
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests;
