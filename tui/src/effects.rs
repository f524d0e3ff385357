//! Color and motion helpers for the celebration effects.

use ratatui::style::Color;

use midnight_engine::{AnimPhase, Rgb};

use crate::theme::Palette;

pub(crate) fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Eased roll progress; a completed or absent effect counts as finished.
pub(crate) fn roll_progress(phase: Option<AnimPhase>) -> f32 {
    match phase {
        Some(AnimPhase::Running { progress }) => ease_out_cubic(progress),
        Some(AnimPhase::Completed) | None => 1.0,
    }
}

/// Brightness multiplier for the banner pulse, between 0.7 and 1.0.
pub(crate) fn pulse_level(phase: Option<AnimPhase>) -> f32 {
    match phase {
        Some(AnimPhase::Running { progress }) => {
            let wave = (progress * std::f32::consts::TAU).sin();
            0.85 + 0.15 * wave
        }
        Some(AnimPhase::Completed) | None => 1.0,
    }
}

/// `base` scaled by `level`; falls back to `fallback` when RGB blending is off.
pub(crate) fn dim(base: Rgb, level: f32, palette: &Palette, fallback: Color) -> Color {
    if !palette.true_color {
        return fallback;
    }
    let level = level.clamp(0.0, 1.0);
    let scale = |c: u8| (f32::from(c) * level).round() as u8;
    Color::Rgb(scale(base.0), scale(base.1), scale(base.2))
}

/// RGB components of a palette color, if it has any.
pub(crate) fn rgb_of(color: Color) -> Option<Rgb> {
    match color {
        Color::Rgb(r, g, b) => Some(Rgb(r, g, b)),
        _ => None,
    }
}
