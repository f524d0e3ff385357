//! Color theme and glyphs for the midnight TUI.
//!
//! Gilded-masquerade palette by default with an optional high-contrast override.

use ratatui::style::{Color, Modifier, Style};

use midnight_engine::UiOptions;

/// Masquerade palette constants.
mod colors {
    use super::Color;

    // === Backgrounds ===
    pub const BG_DARK: Color = Color::Rgb(10, 8, 6);
    pub const BG_RING: Color = Color::Rgb(28, 22, 12);

    // === Foregrounds ===
    pub const TEXT_PRIMARY: Color = Color::Rgb(254, 243, 199); // amber-100
    pub const TEXT_MUTED: Color = Color::Rgb(146, 124, 82);

    // === Gold ramp ===
    pub const GOLD_LIGHT: Color = Color::Rgb(253, 230, 138); // amber-200
    pub const GOLD: Color = Color::Rgb(251, 191, 36); // amber-400
    pub const GOLD_DEEP: Color = Color::Rgb(217, 119, 6); // amber-600

    // === Backdrop ===
    pub const STAR: Color = Color::Rgb(90, 84, 110);
}

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_ring: Color,
    pub text_primary: Color,
    pub text_muted: Color,
    pub gold_light: Color,
    pub gold: Color,
    pub gold_deep: Color,
    pub star: Color,
    /// Whether particle and pulse colors may be blended as RGB.
    pub true_color: bool,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_dark: colors::BG_DARK,
            bg_ring: colors::BG_RING,
            text_primary: colors::TEXT_PRIMARY,
            text_muted: colors::TEXT_MUTED,
            gold_light: colors::GOLD_LIGHT,
            gold: colors::GOLD,
            gold_deep: colors::GOLD_DEEP,
            star: colors::STAR,
            true_color: true,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg_dark: Color::Black,
            bg_ring: Color::Black,
            text_primary: Color::White,
            text_muted: Color::Gray,
            gold_light: Color::LightYellow,
            gold: Color::Yellow,
            gold_deep: Color::Yellow,
            star: Color::Gray,
            true_color: false,
        }
    }
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

/// ASCII/Unicode glyphs for digits, rings, particles and stars.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    /// One lit pixel of the big-digit font (drawn twice per pixel for aspect).
    pub digit_fill: &'static str,
    pub ring: &'static str,
    pub ring_marker: &'static str,
    /// Particle glyphs from brightest to dimmest.
    pub particle: [&'static str; 3],
    pub star_frames: &'static [&'static str],
    pub separator: &'static str,
}

const STAR_FRAMES: &[&str] = &["·", "✦", "✧", "·"];
const STAR_FRAMES_ASCII: &[&str] = &[".", "*", "+", "."];

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            digit_fill: "#",
            ring: "o",
            ring_marker: "@",
            particle: ["*", "+", "."],
            star_frames: STAR_FRAMES_ASCII,
            separator: "-",
        }
    } else {
        Glyphs {
            digit_fill: "█",
            ring: "·",
            ring_marker: "●",
            particle: ["●", "•", "·"],
            star_frames: STAR_FRAMES,
            separator: "─",
        }
    }
}

/// When `reduced_motion` is enabled, returns a static star instead of twinkling.
#[must_use]
pub fn star_frame(phase: usize, options: UiOptions) -> &'static str {
    let frames = glyphs(options).star_frames;
    if options.reduced_motion {
        frames[0]
    } else {
        frames[phase % frames.len()]
    }
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn digits(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.gold)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn unit_label(palette: &Palette) -> Style {
        Style::default().fg(palette.gold_light)
    }

    #[must_use]
    pub fn title(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.gold_deep)
            .add_modifier(Modifier::BOLD)
    }
}
