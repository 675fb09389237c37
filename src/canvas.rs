//! Raster drawing primitives on an RGBA canvas.
//!
//! Coordinates are signed so shapes may hang off the canvas edge; every
//! primitive clips to the canvas. Bounding boxes are inclusive on both ends
//! and fills overwrite pixels without anti-aliasing.

use image::{Rgb, Rgba, RgbaImage};

/// Fully opaque version of a palette colour.
pub fn opaque(color: Rgb<u8>) -> Rgba<u8> {
    Rgba([color[0], color[1], color[2], 255])
}

/// Interpolates from `from` towards `to`, truncating each channel.
pub fn lerp_color(from: Rgb<u8>, to: Rgb<u8>, t: f64) -> Rgb<u8> {
    let channel = |i: usize| {
        let a = f64::from(from[i]);
        let b = f64::from(to[i]);
        (a + (b - a) * t) as u8
    };
    Rgb([channel(0), channel(1), channel(2)])
}

fn put(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && x < i64::from(canvas.width()) && y < i64::from(canvas.height()) {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

/// Composites `color` at `alpha` over the existing pixel (source-over).
pub fn blend_pixel(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgb<u8>, alpha: u8) {
    if x < 0 || y < 0 || x >= i64::from(canvas.width()) || y >= i64::from(canvas.height()) {
        return;
    }
    let dst = *canvas.get_pixel(x as u32, y as u32);
    canvas.put_pixel(x as u32, y as u32, composite(dst, color, f32::from(alpha) / 255.0));
}

fn composite(dst: Rgba<u8>, color: Rgb<u8>, coverage: f32) -> Rgba<u8> {
    let src_a = coverage.clamp(0.0, 1.0);
    let dst_a = f32::from(dst[3]) / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |i: usize| {
        let value =
            (f32::from(color[i]) * src_a + f32::from(dst[i]) * dst_a * (1.0 - src_a)) / out_a;
        value.round().clamp(0.0, 255.0) as u8
    };
    Rgba([channel(0), channel(1), channel(2), (out_a * 255.0).round() as u8])
}

/// Fills the inclusive box `[x0, y0, x1, y1]`. An inverted box draws nothing.
pub fn fill_rect(canvas: &mut RgbaImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgba<u8>) {
    let x_end = x1.min(i64::from(canvas.width()) - 1);
    let y_end = y1.min(i64::from(canvas.height()) - 1);
    for y in y0.max(0)..=y_end {
        for x in x0.max(0)..=x_end {
            canvas.put_pixel(x as u32, y as u32, color);
        }
    }
}

/// Which quarter of a disc a pieslice covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Fills a 90 degree pieslice of radius `r` centred on `(cx, cy)`.
///
/// The slice includes both bounding radii, so it shares its straight edges
/// with whatever rectangles meet it.
pub fn fill_pieslice(
    canvas: &mut RgbaImage,
    cx: i64,
    cy: i64,
    r: i64,
    quadrant: Quadrant,
    color: Rgba<u8>,
) {
    if r < 0 {
        return;
    }
    let (xs, ys) = match quadrant {
        Quadrant::TopLeft => (cx - r..=cx, cy - r..=cy),
        Quadrant::TopRight => (cx..=cx + r, cy - r..=cy),
        Quadrant::BottomLeft => (cx - r..=cx, cy..=cy + r),
        Quadrant::BottomRight => (cx..=cx + r, cy..=cy + r),
    };
    for y in ys {
        for x in xs.clone() {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy <= r * r {
                put(canvas, x, y, color);
            }
        }
    }
}

/// Fills a disc of radius `r` centred on `(cx, cy)`.
pub fn fill_disc(canvas: &mut RgbaImage, cx: i64, cy: i64, r: i64, color: Rgba<u8>) {
    for y in cy - r..=cy + r {
        for x in cx - r..=cx + r {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy <= r * r {
                put(canvas, x, y, color);
            }
        }
    }
}

/// Fills the inclusive box `[x0, y0, x1, y1]` with corners rounded to `radius`.
///
/// Drawn as a plus of two rectangles with a pieslice in each corner. Every
/// pieslice centre lies on the inner corner of the plus, so the pieces tile
/// without gaps.
pub fn fill_rounded_rect(canvas: &mut RgbaImage, bbox: [i64; 4], radius: i64, color: Rgba<u8>) {
    let [x0, y0, x1, y1] = bbox;
    let r = radius;
    fill_rect(canvas, x0 + r, y0, x1 - r, y1, color);
    fill_rect(canvas, x0, y0 + r, x1, y1 - r, color);
    fill_pieslice(canvas, x0 + r, y0 + r, r, Quadrant::TopLeft, color);
    fill_pieslice(canvas, x1 - r, y0 + r, r, Quadrant::TopRight, color);
    fill_pieslice(canvas, x0 + r, y1 - r, r, Quadrant::BottomLeft, color);
    fill_pieslice(canvas, x1 - r, y1 - r, r, Quadrant::BottomRight, color);
}

/// Draws a straight segment `width` pixels wide with flat ends.
///
/// A pixel is painted when its centre lies within `width / 2` of the segment
/// and projects onto it. Round ends are added separately with [`fill_disc`].
pub fn draw_line(
    canvas: &mut RgbaImage,
    from: (i64, i64),
    to: (i64, i64),
    width: i64,
    color: Rgba<u8>,
) {
    let (fx, fy) = (from.0 as f64, from.1 as f64);
    let (dx, dy) = ((to.0 - from.0) as f64, (to.1 - from.1) as f64);
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 || width <= 0 {
        return;
    }
    let (ux, uy) = (dx / length, dy / length);
    let half = width as f64 / 2.0;
    let pad = width / 2 + 1;

    for y in from.1.min(to.1) - pad..=from.1.max(to.1) + pad {
        for x in from.0.min(to.0) - pad..=from.0.max(to.0) + pad {
            let (px, py) = (x as f64 - fx, y as f64 - fy);
            let along = px * ux + py * uy;
            let across = (px * -uy + py * ux).abs();
            if (0.0..=length).contains(&along) && across <= half {
                put(canvas, x, y, color);
            }
        }
    }
}
