use crate::canvas::{blend_pixel, draw_line, fill_disc, fill_rounded_rect, lerp_color, opaque};
use crate::models::{
    IconGeometry, BASE, BLUE, CRUST, GREEN, HIGHLIGHT_ALPHA, LABEL, MAUVE, PEACH, RED, SURFACE0,
    SURFACE1, YELLOW,
};
use crate::text::LabelFont;
use image::RgbaImage;

/// Renders the icon at `size`x`size`, loading the label font from the host.
pub fn render(size: u32) -> RgbaImage {
    let g = IconGeometry::for_size(size);
    let font = LabelFont::load(g.font_size as f32);
    paint(&g, &font)
}

/// Renders the icon with an already chosen label font.
pub fn render_with_font(size: u32, font: &LabelFont) -> RgbaImage {
    paint(&IconGeometry::for_size(size), font)
}

fn paint(g: &IconGeometry, font: &LabelFont) -> RgbaImage {
    let edge = g.size as u32;
    let mut canvas = RgbaImage::new(edge, edge);

    draw_background(&mut canvas, g);
    draw_highlight_band(&mut canvas, g);
    draw_chevron(&mut canvas, g);
    draw_cursor(&mut canvas, g);
    draw_window_dots(&mut canvas, g);
    draw_label(&mut canvas, g, font);

    canvas
}

/// Alpha of the highlight band at interpolation factor `t` in `[0, 1)`.
pub fn highlight_alpha(t: f64) -> u8 {
    (HIGHLIGHT_ALPHA * (1.0 - t)).clamp(0.0, 255.0) as u8
}

fn draw_background(canvas: &mut RgbaImage, g: &IconGeometry) {
    let far = g.size - g.margin;
    fill_rounded_rect(canvas, [g.margin, g.margin, far, far], g.radius, opaque(CRUST));

    let inner_far = g.size - g.inner_margin;
    fill_rounded_rect(
        canvas,
        [g.inner_margin, g.inner_margin, inner_far, inner_far],
        g.inner_radius,
        opaque(BASE),
    );
}

/// Fades a surface-coloured strip into the top of the inner background.
fn draw_highlight_band(canvas: &mut RgbaImage, g: &IconGeometry) {
    let left = g.inner_margin + g.inner_radius;
    let right = g.size - g.inner_margin - g.inner_radius;
    for y in g.inner_margin..g.inner_margin + g.band_rows {
        let t = (y - g.inner_margin) as f64 / g.band_extent;
        let color = lerp_color(SURFACE0, BASE, t);
        let alpha = highlight_alpha(t);
        for x in left..right {
            blend_pixel(canvas, x, y, color, alpha);
        }
    }
}

fn draw_chevron(canvas: &mut RgbaImage, g: &IconGeometry) {
    let [upper, vertex, lower] = g.chevron_points();
    draw_line(canvas, upper, vertex, g.stroke, opaque(BLUE));
    draw_line(canvas, lower, vertex, g.stroke, opaque(MAUVE));

    let cap = g.stroke / 2;
    fill_disc(canvas, upper.0, upper.1, cap, opaque(BLUE));
    fill_disc(canvas, lower.0, lower.1, cap, opaque(MAUVE));
    fill_disc(canvas, vertex.0, vertex.1, cap, opaque(BLUE));

    // Oversized so it hides the seam where the arms overlap.
    let joint = lerp_color(BLUE, MAUVE, 0.5);
    fill_disc(canvas, vertex.0, vertex.1, cap + 2, opaque(joint));
}

fn draw_cursor(canvas: &mut RgbaImage, g: &IconGeometry) {
    fill_rounded_rect(
        canvas,
        [g.cursor_x, g.cursor_y, g.cursor_x + g.cursor_w, g.cursor_y + g.cursor_h],
        g.cursor_radius,
        opaque(PEACH),
    );
}

fn draw_window_dots(canvas: &mut RgbaImage, g: &IconGeometry) {
    for (i, color) in [RED, YELLOW, GREEN].into_iter().enumerate() {
        let x = g.dot_x + i as i64 * g.dot_spacing;
        fill_disc(canvas, x, g.dot_y, g.dot_radius, opaque(color));
    }
}

fn draw_label(canvas: &mut RgbaImage, g: &IconGeometry, font: &LabelFont) {
    let (width, _) = font.measure(LABEL);
    let x = (g.size - width).div_euclid(2) + g.label_shift;
    font.draw(canvas, x, g.label_y, LABEL, SURFACE1);
}
