//! Big block-digit font.
//!
//! Each glyph is a 3x5 pixel bitmap; every pixel is drawn two cells wide so the
//! digits look square in a typical terminal cell aspect.

/// Rows per glyph.
pub const DIGIT_HEIGHT: u16 = 5;
const PIXEL_WIDTH: usize = 2;
const GLYPH_PIXELS: usize = 3;
/// Cells per glyph.
pub const DIGIT_WIDTH: u16 = (GLYPH_PIXELS * PIXEL_WIDTH) as u16;
/// Blank cells between glyphs.
pub const DIGIT_GAP: u16 = 1;

type Bitmap = [&'static str; DIGIT_HEIGHT as usize];

const BLANK: Bitmap = ["   ", "   ", "   ", "   ", "   "];

fn bitmap(ch: char) -> Bitmap {
    match ch {
        '0' => ["###", "# #", "# #", "# #", "###"],
        '1' => [" # ", "## ", " # ", " # ", "###"],
        '2' => ["###", "  #", "###", "#  ", "###"],
        '3' => ["###", "  #", "###", "  #", "###"],
        '4' => ["# #", "# #", "###", "  #", "  #"],
        '5' => ["###", "#  ", "###", "  #", "###"],
        '6' => ["###", "#  ", "###", "# #", "###"],
        '7' => ["###", "  #", "  #", "  #", "  #"],
        '8' => ["###", "# #", "###", "# #", "###"],
        '9' => ["###", "# #", "###", "  #", "###"],
        ':' => ["   ", " # ", "   ", " # ", "   "],
        _ => BLANK,
    }
}

fn render_row(pattern: &str, fill: &str) -> String {
    let mut row = String::new();
    for pixel in pattern.chars() {
        let cell = if pixel == '#' { fill } else { " " };
        for _ in 0..PIXEL_WIDTH {
            row.push_str(cell);
        }
    }
    row
}

/// Cells needed to draw `text` in the big font.
#[must_use]
pub fn text_width(text: &str) -> u16 {
    let glyphs = text.chars().count() as u16;
    if glyphs == 0 {
        return 0;
    }
    glyphs * DIGIT_WIDTH + (glyphs - 1) * DIGIT_GAP
}

/// `DIGIT_HEIGHT` rows spelling out `text`; unknown characters render blank.
#[must_use]
pub fn text_rows(text: &str, fill: &str) -> Vec<String> {
    let gap = " ".repeat(DIGIT_GAP as usize);
    (0..DIGIT_HEIGHT as usize)
        .map(|row| {
            text.chars()
                .map(|ch| render_row(bitmap(ch)[row], fill))
                .collect::<Vec<_>>()
                .join(&gap)
        })
        .collect()
}

/// Rows of a single glyph rolling from `from` (scrolling up and out) to `to`
/// (scrolling in from below). `offset` 0 shows `from`, `DIGIT_HEIGHT + 1`
/// shows `to`.
#[must_use]
pub fn rolled_rows(from: char, to: char, offset: u16, fill: &str) -> Vec<String> {
    let strip: Vec<&str> = bitmap(from)
        .into_iter()
        .chain(std::iter::once("   "))
        .chain(bitmap(to))
        .collect();
    let offset = usize::from(offset.min(DIGIT_HEIGHT + 1));
    strip[offset..offset + DIGIT_HEIGHT as usize]
        .iter()
        .map(|pattern| render_row(pattern, fill))
        .collect()
}

/// Rows of `from` rolling into `to`, glyph by glyph: positions that differ
/// roll, the rest stay put. Texts of different length swap halfway instead.
#[must_use]
pub fn roll_text_rows(from: &str, to: &str, offset: u16, fill: &str) -> Vec<String> {
    let offset = offset.min(DIGIT_HEIGHT + 1);
    let from_chars: Vec<char> = from.chars().collect();
    let to_chars: Vec<char> = to.chars().collect();
    if from_chars.len() != to_chars.len() {
        let shown = if offset * 2 > DIGIT_HEIGHT + 1 { to } else { from };
        return text_rows(shown, fill);
    }

    let columns: Vec<Vec<String>> = from_chars
        .iter()
        .zip(&to_chars)
        .map(|(&a, &b)| {
            if a == b {
                text_rows(&a.to_string(), fill)
            } else {
                rolled_rows(a, b, offset, fill)
            }
        })
        .collect();

    let gap = " ".repeat(DIGIT_GAP as usize);
    (0..DIGIT_HEIGHT as usize)
        .map(|row| {
            columns
                .iter()
                .map(|column| column[row].as_str())
                .collect::<Vec<_>>()
                .join(&gap)
        })
        .collect()
}

/// Roll offset for an eased progress in `[0, 1]`.
#[must_use]
pub fn roll_offset(progress: f32) -> u16 {
    (progress.clamp(0.0, 1.0) * f32::from(DIGIT_HEIGHT + 1)).round() as u16
}
