//! Runtime settings resolved from the config file, CLI flags and environment.

use std::time::Duration;

use chrono::{DateTime, Utc};

use midnight_config::{ConfigError, MidnightConfig, next_new_year, parse_target};
use midnight_types::{StageSchedule, YearLabels, ui::UiOptions};

use crate::fireworks::FireworksSettings;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub target: Option<String>,
    /// Target from the environment; loses to `target`, beats the config file.
    pub env_target: Option<String>,
    pub year: Option<i32>,
    pub ascii_only: bool,
    pub high_contrast: bool,
    pub reduced_motion: bool,
    pub no_chime: bool,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub target: DateTime<Utc>,
    pub years: YearLabels,
    pub schedule: StageSchedule,
    pub fireworks: FireworksSettings,
    pub ui: UiOptions,
    pub chime: bool,
}

impl Settings {
    /// Defaults around a fixed target.
    #[must_use]
    pub fn for_target(target: DateTime<Utc>) -> Self {
        Self {
            target,
            years: YearLabels::for_target(target),
            schedule: StageSchedule::default(),
            fireworks: FireworksSettings::default(),
            ui: UiOptions::default(),
            chime: true,
        }
    }

    /// Merge overrides over the config file. Without any target the next
    /// local new year is used.
    pub fn resolve(
        config: Option<&MidnightConfig>,
        overrides: &Overrides,
        now: DateTime<Utc>,
    ) -> Result<Self, ConfigError> {
        let countdown = config.and_then(MidnightConfig::countdown);
        let fireworks = config.and_then(MidnightConfig::fireworks);
        let app = config.and_then(MidnightConfig::app);

        let raw_target = overrides
            .target
            .as_deref()
            .or(overrides.env_target.as_deref())
            .or_else(|| countdown.and_then(|c| c.target.as_deref()));
        let target = match raw_target {
            Some(raw) => parse_target(raw)?,
            None => next_new_year(now).ok_or_else(|| ConfigError::InvalidTarget {
                value: "next new year".to_string(),
            })?,
        };

        let mut settings = Self::for_target(target);

        if let Some(year) = overrides.year.or_else(|| countdown.and_then(|c| c.year)) {
            settings.years = YearLabels::new(year);
        }

        if let Some(countdown) = countdown {
            let defaults = settings.schedule;
            settings.schedule = StageSchedule {
                final_stretch: countdown
                    .final_stretch_ms
                    .map_or(defaults.final_stretch, Duration::from_millis),
                year_hold: countdown
                    .year_hold_ms
                    .map_or(defaults.year_hold, Duration::from_millis),
                digit_roll: countdown
                    .digit_roll_ms
                    .map_or(defaults.digit_roll, Duration::from_millis),
            };
        }

        if let Some(fireworks) = fireworks {
            let defaults = settings.fireworks;
            settings.fireworks = FireworksSettings {
                interval: fireworks
                    .interval_ms
                    .map_or(defaults.interval, Duration::from_millis),
                particles: fireworks.particles.unwrap_or(defaults.particles),
                duration: fireworks.duration_secs.map(Duration::from_secs),
            };
        }

        let (ascii_only, high_contrast, reduced_motion, chime) = app
            .map(|a| (a.ascii_only, a.high_contrast, a.reduced_motion, a.chime))
            .unwrap_or((false, false, false, true));
        settings.ui = UiOptions {
            ascii_only: ascii_only || overrides.ascii_only,
            high_contrast: high_contrast || overrides.high_contrast,
            reduced_motion: reduced_motion || overrides.reduced_motion,
        };
        settings.chime = chime && !overrides.no_chime;

        Ok(settings)
    }
}
