//! TUI rendering for midnight using ratatui.
//!
//! One view per [`Stage`]; particles and the backdrop are painted straight into
//! the frame buffer underneath the stage content.

mod digits;
mod effects;
mod input;
mod theme;

pub use digits::{DIGIT_HEIGHT, roll_text_rows, text_rows, text_width};
pub use input::{InputPump, handle_events, is_quit_event};
pub use theme::{Glyphs, Palette, glyphs, palette, star_frame, styles};

use chrono::Local;
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use midnight_engine::{App, Remaining, Stage, TimeUnit};

use self::digits::roll_offset;
use self::effects::{dim, pulse_level, rgb_of, roll_progress};

const TITLE: &str = "MASQUERADE BALL";
const SUBTITLE: &str = "NEW YEAR'S EVE";
const BANNER: &str = "H A P P Y   N E W   Y E A R";
const BANNER_NARROW: &str = "HAPPY NEW YEAR";
/// Blank cells on each side of a grid column.
const COLUMN_PADDING: u16 = 2;
const RING_STEPS: usize = 96;
const RING_SPIN_PER_FRAME: f32 = 0.12;
/// One backdrop star per this many cells.
const STAR_DENSITY: u32 = 48;
const STAR_TWINKLE_MS: u128 = 350;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    let area = frame.area();

    // Clear with background color
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, area);

    if app.backdrop().is_visible() {
        draw_backdrop(frame.buffer_mut(), area, app, &palette);
    }
    if !app.particles().is_empty() {
        draw_particles(frame.buffer_mut(), area, app, &palette, &glyphs);
    }

    let [body, footer] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

    match app.stage() {
        Stage::Counting {
            final_stretch: false,
        } => draw_countdown(frame, body, app.remaining(), &palette, &glyphs),
        Stage::Counting {
            final_stretch: true,
        } => draw_final_stretch(frame, body, app, &palette, &glyphs),
        Stage::YearShown => {
            let year = app.years().previous.to_string();
            draw_big_centered(frame, body, &year, styles::digits(&palette), &glyphs);
        }
        Stage::DigitRolling => draw_digit_roll(frame, body, app, &palette, &glyphs),
        Stage::Celebrating => draw_celebration(frame, body, app, &palette, &glyphs),
    }

    draw_footer(frame, footer, app, &palette);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn big_lines(rows: Vec<String>, style: Style) -> Vec<Line<'static>> {
    rows.into_iter().map(|row| Line::styled(row, style)).collect()
}

/// Big digits centered in `area`, or plain text when they do not fit.
fn draw_big_centered(frame: &mut Frame, area: Rect, text: &str, style: Style, glyphs: &Glyphs) {
    if text_width(text) > area.width || DIGIT_HEIGHT > area.height {
        let rect = centered(area, area.width, 1);
        frame.render_widget(
            Paragraph::new(Line::styled(text.to_string(), style)).alignment(Alignment::Center),
            rect,
        );
        return;
    }
    let rect = centered(area, text_width(text), DIGIT_HEIGHT);
    let lines = big_lines(text_rows(text, glyphs.digit_fill), style);
    frame.render_widget(Paragraph::new(lines), rect);
}

fn draw_countdown(
    frame: &mut Frame,
    area: Rect,
    remaining: Remaining,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let columns: Vec<(TimeUnit, String, u16)> = TimeUnit::ALL
        .into_iter()
        .map(|unit| {
            let value = remaining.padded(unit);
            let width = text_width(&value).max(unit.label().len() as u16) + COLUMN_PADDING * 2;
            (unit, value, width)
        })
        .collect();
    let grid_width: u16 = columns.iter().map(|(_, _, width)| *width).sum();
    // Title, gap, digits, gap, labels.
    let block_height = 1 + 1 + DIGIT_HEIGHT + 1 + 1;

    let rule = glyphs.separator.repeat(2);
    let title = format!("{rule} {TITLE} {rule} {SUBTITLE} {rule}");

    if grid_width > area.width || block_height > area.height {
        draw_compact_countdown(frame, area, remaining, &title, palette);
        return;
    }

    let block = centered(area, grid_width, block_height);
    frame.render_widget(
        Paragraph::new(Line::styled(title, styles::title(palette))).alignment(Alignment::Center),
        Rect { height: 1, ..block },
    );

    let digits_y = block.y + 2;
    let labels_y = digits_y + DIGIT_HEIGHT + 1;
    let mut x = block.x;
    for (unit, value, width) in columns {
        let lines = big_lines(text_rows(&value, glyphs.digit_fill), styles::digits(palette));
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            Rect::new(x, digits_y, width, DIGIT_HEIGHT),
        );
        frame.render_widget(
            Paragraph::new(Line::styled(
                unit.label().to_uppercase(),
                styles::unit_label(palette),
            ))
            .alignment(Alignment::Center),
            Rect::new(x, labels_y, width, 1),
        );
        x += width;
    }
}

fn draw_compact_countdown(
    frame: &mut Frame,
    area: Rect,
    remaining: Remaining,
    title: &str,
    palette: &Palette,
) {
    let mut spans = Vec::new();
    for (i, unit) in TimeUnit::ALL.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(remaining.padded(unit), styles::digits(palette)));
        spans.push(Span::styled(
            format!(" {}", unit.label()),
            styles::unit_label(palette),
        ));
    }
    let lines = vec![
        Line::styled(title.to_string(), styles::title(palette)),
        Line::from(spans),
    ];
    let rect = centered(area, area.width, lines.len() as u16);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), rect);
}

fn draw_final_stretch(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let seconds = app.remaining().whole_seconds().to_string();

    let radius_y = (area.height / 2).saturating_sub(1).min(9);
    if radius_y > DIGIT_HEIGHT / 2 + 1 {
        let radius_x = f32::from(radius_y) * 2.0;
        let radius_y = f32::from(radius_y);
        let cx = f32::from(area.x) + f32::from(area.width) / 2.0;
        let cy = f32::from(area.y) + f32::from(area.height) / 2.0;
        let ring = Style::default().fg(palette.gold_deep).bg(palette.bg_ring);
        let buf = frame.buffer_mut();

        for step in 0..RING_STEPS {
            let angle = step as f32 / RING_STEPS as f32 * std::f32::consts::TAU;
            put(
                buf,
                area,
                cx + radius_x * angle.cos(),
                cy + radius_y * angle.sin(),
                glyphs.ring,
                ring,
            );
        }

        // Marker starts at twelve o'clock and sweeps clockwise.
        let spin = if app.ui_options().reduced_motion {
            0.0
        } else {
            app.frame() as f32 * RING_SPIN_PER_FRAME
        };
        let angle = spin - std::f32::consts::FRAC_PI_2;
        put(
            buf,
            area,
            cx + radius_x * angle.cos(),
            cy + radius_y * angle.sin(),
            glyphs.ring_marker,
            Style::default().fg(palette.gold_light),
        );
    }

    draw_big_centered(frame, area, &seconds, styles::digits(palette), glyphs);
}

fn put(buf: &mut Buffer, area: Rect, x: f32, y: f32, symbol: &str, style: Style) {
    let (x, y) = (x.floor(), y.floor());
    if x < f32::from(area.left())
        || y < f32::from(area.top())
        || x >= f32::from(area.right())
        || y >= f32::from(area.bottom())
    {
        return;
    }
    if let Some(cell) = buf.cell_mut((x as u16, y as u16)) {
        cell.set_symbol(symbol).set_style(style);
    }
}

fn draw_digit_roll(frame: &mut Frame, area: Rect, app: &App, palette: &Palette, glyphs: &Glyphs) {
    let years = app.years();
    let (from, to) = (years.previous.to_string(), years.next.to_string());
    let offset = roll_offset(roll_progress(app.digit_roll_phase()));

    let width = text_width(&from).max(text_width(&to));
    if width > area.width || DIGIT_HEIGHT > area.height {
        let shown = if offset == 0 { from } else { to };
        draw_big_centered(frame, area, &shown, styles::digits(palette), glyphs);
        return;
    }

    let rows = roll_text_rows(&from, &to, offset, glyphs.digit_fill);
    let rect = centered(area, width, DIGIT_HEIGHT);
    frame.render_widget(
        Paragraph::new(big_lines(rows, styles::digits(palette))),
        rect,
    );
}

fn draw_celebration(frame: &mut Frame, area: Rect, app: &App, palette: &Palette, glyphs: &Glyphs) {
    let level = pulse_level(app.banner_phase());
    let glow = rgb_of(palette.gold).map_or(palette.gold, |rgb| {
        dim(rgb, level, palette, palette.gold)
    });
    let banner_style = styles::title(palette).fg(glow);
    let year_style = styles::digits(palette).fg(glow);

    let banner = if (BANNER.len() as u16) <= area.width {
        BANNER
    } else {
        BANNER_NARROW
    };
    let year = app.years().next.to_string();

    // Banner, gap, year.
    let block_height = 2 + DIGIT_HEIGHT;
    let block = centered(area, area.width, block_height);
    frame.render_widget(
        Paragraph::new(Line::styled(banner, banner_style)).alignment(Alignment::Center),
        Rect { height: 1, ..block },
    );
    let year_area = Rect {
        y: block.y.saturating_add(2),
        height: block.height.saturating_sub(2),
        ..block
    };
    if year_area.height > 0 {
        draw_big_centered(frame, year_area, &year, year_style, glyphs);
    }
}

/// Cheap deterministic scatter so stars keep their places between frames.
fn scatter(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn draw_backdrop(buf: &mut Buffer, area: Rect, app: &App, palette: &Palette) {
    if area.is_empty() {
        return;
    }
    let stars = u32::from(area.width) * u32::from(area.height) / STAR_DENSITY;
    let tick = (app.backdrop().position().as_millis() / STAR_TWINKLE_MS) as usize;
    let style = Style::default().fg(palette.star);

    for i in 0..stars {
        let h = scatter(u64::from(i));
        let x = area.x + (h % u64::from(area.width)) as u16;
        let y = area.y + ((h >> 20) % u64::from(area.height)) as u16;
        let phase = tick.wrapping_add((h >> 40) as usize);
        if let Some(cell) = buf.cell_mut((x, y))
            && cell.symbol() == " "
        {
            cell.set_symbol(star_frame(phase, app.ui_options()))
                .set_style(style);
        }
    }
}

fn draw_particles(buf: &mut Buffer, area: Rect, app: &App, palette: &Palette, glyphs: &Glyphs) {
    let width = f32::from(area.width);
    let height = f32::from(area.height);
    for particle in app.particles().particles() {
        let brightness = particle.brightness();
        let glyph = if brightness > 0.66 {
            glyphs.particle[0]
        } else if brightness > 0.33 {
            glyphs.particle[1]
        } else {
            glyphs.particle[2]
        };
        let color = dim(
            particle.color(),
            0.35 + 0.65 * brightness,
            palette,
            palette.gold,
        );
        put(
            buf,
            area,
            f32::from(area.x) + particle.x() * width,
            f32::from(area.y) + particle.y() * height,
            glyph,
            Style::default().fg(color),
        );
    }
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let target = app
        .target()
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    let line = Line::from(vec![
        Span::styled("q", styles::key_highlight(palette)),
        Span::styled(" quit", styles::key_hint(palette)),
        Span::styled("   target ", styles::key_hint(palette)),
        Span::styled(target, styles::key_hint(palette)),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
