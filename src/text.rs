use crate::canvas::blend_pixel;
use ab_glyph::{point, Font, FontVec, OutlinedGlyph, PxScale, ScaleFont};
use image::{Rgb, RgbaImage};
use log::debug;
use std::error::Error;
use std::fs;
use std::path::Path;

/// Monospace face used for the label when the host has it.
pub const MONOSPACE_FONT_PATH: &str = "/System/Library/Fonts/Menlo.ttc";

const BITMAP_WIDTH: i64 = 5;
const BITMAP_HEIGHT: i64 = 7;
const BITMAP_ADVANCE: i64 = BITMAP_WIDTH + 1;

/// Font used to draw the label.
pub enum LabelFont {
    /// A scalable face loaded from disk.
    Outline { font: FontVec, scale: PxScale },
    /// The built-in 5x7 bitmap face.
    Bitmap,
}

impl LabelFont {
    /// Loads the monospace face at `pixel_size`, or the bitmap face if that fails.
    pub fn load(pixel_size: f32) -> Self {
        Self::load_from(Path::new(MONOSPACE_FONT_PATH), pixel_size)
    }

    pub fn load_from(path: &Path, pixel_size: f32) -> Self {
        match load_outline(path, pixel_size) {
            Ok(font) => {
                debug!("Label font: {} at {}px", path.display(), pixel_size);
                font
            }
            Err(e) => {
                debug!("Label font {} unavailable ({}), using bitmap face", path.display(), e);
                LabelFont::Bitmap
            }
        }
    }

    /// Width and height of the ink box `text` covers when drawn at the origin.
    pub fn measure(&self, text: &str) -> (i64, i64) {
        match self {
            LabelFont::Outline { font, scale } => {
                let glyphs = layout(font, *scale, text, 0.0, 0.0);
                let mut bounds: Option<(f32, f32, f32, f32)> = None;
                for glyph in &glyphs {
                    let b = glyph.px_bounds();
                    bounds = Some(match bounds {
                        None => (b.min.x, b.min.y, b.max.x, b.max.y),
                        Some((x0, y0, x1, y1)) => (
                            x0.min(b.min.x),
                            y0.min(b.min.y),
                            x1.max(b.max.x),
                            y1.max(b.max.y),
                        ),
                    });
                }
                bounds.map_or((0, 0), |(x0, y0, x1, y1)| ((x1 - x0) as i64, (y1 - y0) as i64))
            }
            LabelFont::Bitmap => {
                let chars = text.chars().count() as i64;
                if chars == 0 {
                    (0, 0)
                } else {
                    (chars * BITMAP_ADVANCE - 1, BITMAP_HEIGHT)
                }
            }
        }
    }

    /// Draws `text` with the top of its line box at `(x, y)`.
    pub fn draw(&self, canvas: &mut RgbaImage, x: i64, y: i64, text: &str, color: Rgb<u8>) {
        match self {
            LabelFont::Outline { font, scale } => {
                for glyph in layout(font, *scale, text, x as f32, y as f32) {
                    let min = glyph.px_bounds().min;
                    glyph.draw(|gx, gy, coverage| {
                        let alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                        if alpha > 0 {
                            let px = min.x as i64 + i64::from(gx);
                            let py = min.y as i64 + i64::from(gy);
                            blend_pixel(canvas, px, py, color, alpha);
                        }
                    });
                }
            }
            LabelFont::Bitmap => {
                for (i, c) in text.chars().enumerate() {
                    let Some(rows) = bitmap_glyph(c) else { continue };
                    let left = x + i as i64 * BITMAP_ADVANCE;
                    for (row, bits) in rows.iter().enumerate() {
                        for col in 0..BITMAP_WIDTH {
                            if bits & (1 << (BITMAP_WIDTH - 1 - col)) != 0 {
                                blend_pixel(canvas, left + col, y + row as i64, color, 255);
                            }
                        }
                    }
                }
            }
        }
    }
}

fn load_outline(path: &Path, pixel_size: f32) -> Result<LabelFont, Box<dyn Error>> {
    let data = fs::read(path)?;
    let font = FontVec::try_from_vec_and_index(data, 0)?;
    let units_per_em = font.units_per_em().ok_or("font has no units-per-em")?;
    // The em square, not the ascent-to-descent height, should span `pixel_size`.
    let scale = PxScale::from(pixel_size * font.height_unscaled() / units_per_em);
    Ok(LabelFont::Outline { font, scale })
}

/// Lays `text` out on one line whose line box starts at `(x, y)`.
fn layout(font: &FontVec, scale: PxScale, text: &str, x: f32, y: f32) -> Vec<OutlinedGlyph> {
    let scaled = font.as_scaled(scale);
    let mut caret = point(x, y + scaled.ascent());
    let mut previous = None;
    let mut glyphs = Vec::new();
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(previous) = previous {
            caret.x += scaled.kern(previous, id);
        }
        let glyph = id.with_scale_and_position(scale, caret);
        caret.x += scaled.h_advance(id);
        previous = Some(id);
        if let Some(outlined) = font.outline_glyph(glyph) {
            glyphs.push(outlined);
        }
    }
    glyphs
}

/// Rows of a 5x7 glyph, most significant of the low five bits leftmost.
fn bitmap_glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        _ => return None,
    };
    Some(rows)
}

/// DejaVu Sans Mono, shipped with the tests so the outline path runs on every host.
#[cfg(test)]
pub(crate) fn fixture_font(pixel_size: f32) -> LabelFont {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/DejaVuSansMono.ttf");
    let font = LabelFont::load_from(&path, pixel_size);
    assert!(matches!(font, LabelFont::Outline { .. }), "fixture font failed to load");
    font
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const INK: Rgb<u8> = Rgb([0x45, 0x47, 0x5a]);

    /// Inclusive bounds of every pixel with any alpha.
    fn ink_bounds(canvas: &RgbaImage) -> Option<(i64, i64, i64, i64)> {
        canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| p[3] > 0)
            .fold(None, |acc, (x, y, _)| {
                let (x, y) = (i64::from(x), i64::from(y));
                Some(match acc {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                })
            })
    }

    #[test]
    fn outline_scale_spans_the_em_square() {
        let LabelFont::Outline { font, scale } = fixture_font(81.0) else {
            unreachable!()
        };
        let units_per_em = font.units_per_em().unwrap();
        let expected = 81.0 * font.height_unscaled() / units_per_em;
        assert!((scale.x - expected).abs() < 1e-3);
        assert!((scale.y - expected).abs() < 1e-3);
        // Ascent to descent is taller than the em square for this face.
        assert!(scale.y > 81.0);
    }

    #[test]
    fn outline_measure_reports_ink_box() {
        let font = fixture_font(81.0);
        let (width, height) = font.measure("OE");
        assert!(width > 0 && height > 0);
        assert!(height < 81);
        assert!(width > font.measure("O").0);
        assert_eq!(font.measure(""), (0, 0));
    }

    #[test]
    fn outline_draw_keeps_ink_in_line_box() {
        let font = fixture_font(81.0);
        let LabelFont::Outline { font: face, scale } = &font else {
            unreachable!()
        };
        let line_height = face.as_scaled(*scale).height().ceil() as i64;
        let (width, height) = font.measure("OE");

        let (x, y) = (20, 30);
        let mut canvas = RgbaImage::new(200, 160);
        font.draw(&mut canvas, x, y, "OE", INK);
        let (x0, y0, x1, y1) = ink_bounds(&canvas).expect("no ink drawn");

        assert!(x0 >= x && x0 - x <= width / 4, "left bearing {}", x0 - x);
        assert!(y0 >= y && y1 < y + line_height);
        assert!((width - 2..=width).contains(&(x1 - x0 + 1)));
        assert!((height - 2..=height).contains(&(y1 - y0 + 1)));
    }

    #[test]
    fn missing_font_falls_back_to_bitmap() {
        let font = LabelFont::load_from(Path::new("/nonexistent/font.ttc"), 81.0);
        assert!(matches!(font, LabelFont::Bitmap));
    }

    #[test]
    fn garbage_font_file_falls_back_to_bitmap() {
        let path = std::env::temp_dir()
            .join(format!("iconforge-garbage-{}.ttf", std::process::id()));
        fs::write(&path, b"definitely not a font").unwrap();
        let font = LabelFont::load_from(&path, 81.0);
        fs::remove_file(&path).unwrap();
        assert!(matches!(font, LabelFont::Bitmap));
    }

    #[test]
    fn bitmap_measure_covers_every_cell() {
        assert_eq!(LabelFont::Bitmap.measure("OE"), (11, 7));
        assert_eq!(LabelFont::Bitmap.measure("A"), (5, 7));
        assert_eq!(LabelFont::Bitmap.measure(""), (0, 0));
    }

    #[test]
    fn bitmap_draw_stays_inside_measured_box() {
        let mut canvas = RgbaImage::new(40, 20);
        LabelFont::Bitmap.draw(&mut canvas, 3, 4, "OE", INK);
        let (w, h) = LabelFont::Bitmap.measure("OE");
        for (x, y, pixel) in canvas.enumerate_pixels() {
            let inside = (3..3 + w).contains(&i64::from(x)) && (4..4 + h).contains(&i64::from(y));
            if !inside {
                assert_eq!(pixel[3], 0, "ink outside box at ({x}, {y})");
            }
        }
        // Top bar of the E and the left side of the O.
        assert_eq!(*canvas.get_pixel(9, 4), Rgba([0x45, 0x47, 0x5a, 255]));
        assert_eq!(*canvas.get_pixel(13, 4), Rgba([0x45, 0x47, 0x5a, 255]));
        assert_eq!(*canvas.get_pixel(3, 6), Rgba([0x45, 0x47, 0x5a, 255]));
        assert_eq!(canvas.get_pixel(3, 4)[3], 0);
    }

    #[test]
    fn bitmap_skips_unknown_characters() {
        let mut canvas = RgbaImage::new(20, 10);
        LabelFont::Bitmap.draw(&mut canvas, 0, 0, "?", INK);
        assert!(canvas.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn lowercase_uses_uppercase_shapes() {
        assert_eq!(bitmap_glyph('e'), bitmap_glyph('E'));
        assert!(bitmap_glyph('é').is_none());
    }
}
