//! Configuration loading for midnight.
//!
//! The config file lives at `~/.midnight/config.toml`. Every section and field is
//! optional; a missing file is not an error.
//!
//! ```toml
//! [countdown]
//! target = "2026-01-01T00:00:00"
//! year = 2026
//!
//! [fireworks]
//! interval_ms = 250
//! particles = 50
//! duration_secs = 15
//!
//! [app]
//! reduced_motion = false
//! chime = true
//! ```

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Environment variable that overrides the configured target.
pub const TARGET_ENV: &str = "MIDNIGHT_TARGET";

// Default value function for serde (bool::default() is false, so only true needs a fn)
const fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct MidnightConfig {
    pub countdown: Option<CountdownConfig>,
    pub fireworks: Option<FireworksConfig>,
    pub app: Option<AppConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CountdownConfig {
    /// RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS` read in the local time zone.
    pub target: Option<String>,
    /// Year to celebrate. Derived from the target when absent.
    pub year: Option<i32>,
    pub final_stretch_ms: Option<u64>,
    pub year_hold_ms: Option<u64>,
    pub digit_roll_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FireworksConfig {
    pub interval_ms: Option<u64>,
    pub particles: Option<u32>,
    /// Length of the show. Absent means the bursts never stop.
    pub duration_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Use ASCII-only glyphs for digits, rings and particles.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Disable particles and the digit roll.
    #[serde(default)]
    pub reduced_motion: bool,
    /// Ring the terminal bell when the target is reached.
    #[serde(default = "default_true")]
    pub chime: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ascii_only: false,
            high_contrast: false,
            reduced_motion: false,
            chime: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid target timestamp {value:?} (expected RFC 3339 or YYYY-MM-DDTHH:MM:SS)")]
    InvalidTarget { value: String },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => {
                Some(path.as_path())
            }
            ConfigError::InvalidTarget { .. } => None,
        }
    }
}

impl MidnightConfig {
    /// Load from the default location. `Ok(None)` when there is no config file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn countdown(&self) -> Option<&CountdownConfig> {
        self.countdown.as_ref()
    }

    #[must_use]
    pub fn fireworks(&self) -> Option<&FireworksConfig> {
        self.fireworks.as_ref()
    }

    #[must_use]
    pub fn app(&self) -> Option<&AppConfig> {
        self.app.as_ref()
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".midnight").join("config.toml"))
}

/// Target from [`TARGET_ENV`], if set and non-empty.
#[must_use]
pub fn target_from_env() -> Option<String> {
    env::var(TARGET_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse a configured target timestamp.
///
/// Accepts RFC 3339 (`2026-01-01T00:00:00Z`), a naive timestamp read in the local
/// time zone (`2026-01-01T00:00:00`), or a bare date meaning local midnight.
pub fn parse_target(raw: &str) -> Result<DateTime<Utc>, ConfigError> {
    let raw = raw.trim();
    let invalid = || ConfigError::InvalidTarget {
        value: raw.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(invalid)?;

    // `earliest` resolves the ambiguous hour at a DST fall-back; a spring-forward
    // gap has no local instant at all.
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(invalid)
}

/// Local midnight of the next January 1st after `now`.
#[must_use]
pub fn next_new_year(now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let year = now.with_timezone(&Local).year().checked_add(1)?;
    let midnight = NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?;
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
