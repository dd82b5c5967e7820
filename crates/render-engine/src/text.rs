//! Caption rasterization.
//!
//! Two faces are available. The built-in face is a 5x7 bitmap font scaled to
//! the requested pixel size, so captions render without any font file. A
//! TrueType face can be loaded from disk instead.
//!
//! Both faces place text the same way: centered horizontally on the anchor,
//! with the bottom of the glyph box on the anchor's y. The outline is drawn
//! first in black, then the glyphs are filled in white on top.

use std::fmt;
use std::path::Path;

use ab_glyph::{FontArc, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use snapbooth_common::error::{BoothError, BoothResult};

/// Outline width at capture resolution, in pixels.
pub const STROKE_WIDTH: f32 = 2.0;

pub const FILL_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const STROKE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

const GLYPH_COLUMNS: usize = 5;
const GLYPH_ROWS: usize = 7;
/// Horizontal advance per glyph, in cells (5 lit columns + 1 gap).
const GLYPH_ADVANCE: f32 = 6.0;

/// Drawn for characters the bitmap font has no glyph for.
const MISSING_GLYPH: [u8; 7] = [
    0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111,
];

/// Rendered size of a caption, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtent {
    pub width: f32,
    pub height: f32,
}

/// Font used to rasterize captions.
#[derive(Clone, Default)]
pub enum TextFace {
    /// Scalable 5x7 bitmap font covering printable ASCII.
    #[default]
    Builtin,
    /// A TrueType/OpenType font.
    TrueType(FontArc),
}

impl fmt::Debug for TextFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextFace::Builtin => f.write_str("Builtin"),
            TextFace::TrueType(_) => f.write_str("TrueType(..)"),
        }
    }
}

impl TextFace {
    /// Load a TrueType face from a font file.
    pub fn load(path: &Path) -> BoothResult<Self> {
        if !path.exists() {
            return Err(BoothError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let bytes = std::fs::read(path)?;
        let font = FontArc::try_from_vec(bytes).map_err(|e| {
            BoothError::config(format!("Invalid font {}: {e}", path.display()))
        })?;
        Ok(TextFace::TrueType(font))
    }

    /// The configured face, or the built-in one when none is configured or
    /// the configured one cannot be loaded.
    pub fn from_config(font_path: Option<&Path>) -> Self {
        match font_path {
            Some(path) => match Self::load(path) {
                Ok(face) => {
                    tracing::debug!(path = %path.display(), "Loaded caption font");
                    face
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Falling back to built-in caption font"
                    );
                    TextFace::Builtin
                }
            },
            None => TextFace::Builtin,
        }
    }

    /// Size of `text` rendered at `font_px`.
    pub fn measure(&self, text: &str, font_px: f32) -> TextExtent {
        match self {
            TextFace::Builtin => {
                let cell = font_px / GLYPH_ROWS as f32;
                TextExtent {
                    width: builtin_width(text.chars().count(), cell),
                    height: cell * GLYPH_ROWS as f32,
                }
            }
            TextFace::TrueType(font) => {
                let (width, height) = text_size(PxScale::from(font_px), font, text);
                TextExtent {
                    width: width as f32,
                    height: height as f32,
                }
            }
        }
    }

    /// Draw `text` centered on `anchor_x` with its glyph box bottom on `anchor_y`.
    pub fn draw(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        anchor: (f32, f32),
        font_px: f32,
        stroke_width: f32,
    ) {
        if text.is_empty() || font_px <= 0.0 {
            return;
        }
        match self {
            TextFace::Builtin => draw_builtin(canvas, text, anchor, font_px, stroke_width),
            TextFace::TrueType(font) => {
                draw_truetype(canvas, font, text, anchor, font_px, stroke_width)
            }
        }
    }
}

fn builtin_width(glyph_count: usize, cell: f32) -> f32 {
    if glyph_count == 0 {
        return 0.0;
    }
    // The gap after the last glyph is not part of the box.
    (glyph_count as f32 * GLYPH_ADVANCE - 1.0) * cell
}

fn draw_builtin(
    canvas: &mut RgbaImage,
    text: &str,
    (anchor_x, anchor_y): (f32, f32),
    font_px: f32,
    stroke_width: f32,
) {
    let cell = font_px / GLYPH_ROWS as f32;
    let glyphs: Vec<[u8; 7]> = text
        .chars()
        .map(|ch| glyph5x7(ch.to_ascii_uppercase()).unwrap_or(MISSING_GLYPH))
        .collect();

    let left = anchor_x - builtin_width(glyphs.len(), cell) / 2.0;
    let top = anchor_y - cell * GLYPH_ROWS as f32;
    let half_stroke = (stroke_width / 2.0).max(0.0);

    // Outline pass, then fill pass
    for (color, grow) in [(STROKE_COLOR, half_stroke), (FILL_COLOR, 0.0)] {
        if grow == 0.0 && color == STROKE_COLOR {
            continue;
        }
        for (index, rows) in glyphs.iter().enumerate() {
            let origin_x = left + index as f32 * GLYPH_ADVANCE * cell;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_COLUMNS {
                    if bits & (1 << (GLYPH_COLUMNS - 1 - col)) == 0 {
                        continue;
                    }
                    let x0 = origin_x + col as f32 * cell;
                    let y0 = top + row as f32 * cell;
                    fill_span(
                        canvas,
                        (x0 - grow, y0 - grow),
                        (x0 + cell + grow, y0 + cell + grow),
                        color,
                    );
                }
            }
        }
    }
}

/// Fill the pixel span `[min, max)`, clipped to the canvas.
fn fill_span(canvas: &mut RgbaImage, min: (f32, f32), max: (f32, f32), color: Rgba<u8>) {
    let (width, height) = canvas.dimensions();
    let left = min.0.round().max(0.0);
    let top = min.1.round().max(0.0);
    let right = max.0.round().min(width as f32);
    let bottom = max.1.round().min(height as f32);
    if right <= left || bottom <= top {
        return;
    }
    let rect =
        Rect::at(left as i32, top as i32).of_size((right - left) as u32, (bottom - top) as u32);
    draw_filled_rect_mut(canvas, rect, color);
}

fn draw_truetype(
    canvas: &mut RgbaImage,
    font: &FontArc,
    text: &str,
    (anchor_x, anchor_y): (f32, f32),
    font_px: f32,
    stroke_width: f32,
) {
    let scale = PxScale::from(font_px);
    let (width, height) = text_size(scale, font, text);
    let x = (anchor_x - width as f32 / 2.0).round() as i32;
    let y = (anchor_y - height as f32).round() as i32;

    // Outline emulated by stamping the text around a ring.
    let radius = (stroke_width / 2.0).round().max(1.0) as i32;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx == 0 && dy == 0 {
                continue;
            }
            draw_text_mut(canvas, STROKE_COLOR, x + dx, y + dy, scale, font, text);
        }
    }
    draw_text_mut(canvas, FILL_COLOR, x, y, scale, font, text);
}

/// 5x7 glyph rows for printable ASCII (uppercase only).
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b10001,0b01010,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '"' => g!(0b01010,0b01010,0b01010,0b00000,0b00000,0b00000,0b00000),
        '#' => g!(0b01010,0b01010,0b11111,0b01010,0b11111,0b01010,0b01010),
        '$' => g!(0b00100,0b01111,0b10100,0b01110,0b00101,0b11110,0b00100),
        '%' => g!(0b11000,0b11001,0b00010,0b00100,0b01000,0b10011,0b00011),
        '&' => g!(0b01100,0b10010,0b10100,0b01000,0b10101,0b10010,0b01101),
        '\'' => g!(0b00100,0b00100,0b01000,0b00000,0b00000,0b00000,0b00000),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),
        '*' => g!(0b00000,0b00100,0b10101,0b01110,0b10101,0b00100,0b00000),
        '+' => g!(0b00000,0b00100,0b00100,0b11111,0b00100,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b01100,0b00100,0b01000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b01100,0b01100),
        '/' => g!(0b00000,0b00001,0b00010,0b00100,0b01000,0b10000,0b00000),
        ':' => g!(0b00000,0b01100,0b01100,0b00000,0b01100,0b01100,0b00000),
        ';' => g!(0b00000,0b01100,0b01100,0b00000,0b01100,0b00100,0b01000),
        '<' => g!(0b00010,0b00100,0b01000,0b10000,0b01000,0b00100,0b00010),
        '=' => g!(0b00000,0b00000,0b11111,0b00000,0b11111,0b00000,0b00000),
        '>' => g!(0b01000,0b00100,0b00010,0b00001,0b00010,0b00100,0b01000),
        '?' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b00000,0b00100),
        '@' => g!(0b01110,0b10001,0b00001,0b01101,0b10101,0b10101,0b01110),
        '[' => g!(0b01110,0b01000,0b01000,0b01000,0b01000,0b01000,0b01110),
        '\\' => g!(0b00000,0b10000,0b01000,0b00100,0b00010,0b00001,0b00000),
        ']' => g!(0b01110,0b00010,0b00010,0b00010,0b00010,0b00010,0b01110),
        '^' => g!(0b00100,0b01010,0b10001,0b00000,0b00000,0b00000,0b00000),
        '_' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b11111),
        '`' => g!(0b01000,0b00100,0b00010,0b00000,0b00000,0b00000,0b00000),
        '{' => g!(0b00010,0b00100,0b00100,0b01000,0b00100,0b00100,0b00010),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        '}' => g!(0b01000,0b00100,0b00100,0b00010,0b00100,0b00100,0b01000),
        '~' => g!(0b00000,0b00000,0b01000,0b10101,0b00010,0b00000,0b00000),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAY: Rgba<u8> = Rgba([128, 128, 128, 255]);

    #[test]
    fn test_glyphs_cover_printable_ascii() {
        for code in 0x20u8..0x7f {
            let ch = (code as char).to_ascii_uppercase();
            assert!(glyph5x7(ch).is_some(), "missing glyph for {:?}", code as char);
        }
    }

    #[test]
    fn test_builtin_measure() {
        let extent = TextFace::Builtin.measure("HI", 70.0);
        // Two glyphs: 11 cells of 10px.
        assert!((extent.width - 110.0).abs() < 1e-4);
        assert!((extent.height - 70.0).abs() < 1e-4);
        assert_eq!(TextFace::Builtin.measure("", 70.0).width, 0.0);
    }

    #[test]
    fn test_fill_sits_on_top_of_stroke() {
        let mut canvas = RgbaImage::from_pixel(100, 100, GRAY);
        TextFace::Builtin.draw(&mut canvas, "I", (50.0, 80.0), 70.0, STROKE_WIDTH);

        // Cell 10px; glyph box spans x 25..75, y 10..80.
        // Row 1 lights only the center column (x 45..55, y 20..30).
        assert_eq!(*canvas.get_pixel(50, 25), FILL_COLOR);
        assert_eq!(*canvas.get_pixel(44, 25), STROKE_COLOR);
        assert_eq!(*canvas.get_pixel(40, 25), GRAY);
        // Nothing below the anchor line except the outline.
        assert_eq!(*canvas.get_pixel(50, 85), GRAY);
        assert_eq!(*canvas.get_pixel(50, 80), STROKE_COLOR);
    }

    #[test]
    fn test_lowercase_matches_uppercase() {
        let mut upper = RgbaImage::from_pixel(120, 60, GRAY);
        let mut lower = RgbaImage::from_pixel(120, 60, GRAY);
        TextFace::Builtin.draw(&mut upper, "OK", (60.0, 50.0), 35.0, STROKE_WIDTH);
        TextFace::Builtin.draw(&mut lower, "ok", (60.0, 50.0), 35.0, STROKE_WIDTH);
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_unknown_character_draws_box() {
        let mut canvas = RgbaImage::from_pixel(60, 60, GRAY);
        TextFace::Builtin.draw(&mut canvas, "\u{1F600}", (30.0, 50.0), 35.0, 0.0);
        // Cell 5px; box spans x 17.5..42.5, y 15..50. Corners lit, center hollow.
        assert_eq!(*canvas.get_pixel(20, 17), FILL_COLOR);
        assert_eq!(*canvas.get_pixel(30, 32), GRAY);
    }

    #[test]
    fn test_text_outside_canvas_is_clipped() {
        let mut canvas = RgbaImage::from_pixel(20, 20, GRAY);
        TextFace::Builtin.draw(&mut canvas, "WIDE CAPTION", (0.0, 5.0), 120.0, STROKE_WIDTH);
        TextFace::Builtin.draw(&mut canvas, "X", (-500.0, -500.0), 48.0, STROKE_WIDTH);
    }

    #[test]
    fn test_missing_font_falls_back() {
        let face = TextFace::from_config(Some(Path::new("/nonexistent/caption.ttf")));
        assert!(matches!(face, TextFace::Builtin));
        assert!(matches!(
            TextFace::load(Path::new("/nonexistent/caption.ttf")),
            Err(BoothError::FileNotFound { .. })
        ));
    }
}
