use image::Rgb;
use std::path::{Path, PathBuf};

// --- Catppuccin Mocha palette ---
pub const BASE: Rgb<u8> = Rgb([0x1e, 0x1e, 0x2e]);
pub const CRUST: Rgb<u8> = Rgb([0x11, 0x11, 0x1b]);
pub const SURFACE0: Rgb<u8> = Rgb([0x31, 0x32, 0x44]);
pub const SURFACE1: Rgb<u8> = Rgb([0x45, 0x47, 0x5a]);
pub const BLUE: Rgb<u8> = Rgb([0x89, 0xb4, 0xfa]);
pub const MAUVE: Rgb<u8> = Rgb([0xcb, 0xa6, 0xf7]);
pub const PEACH: Rgb<u8> = Rgb([0xfa, 0xb3, 0x87]);
pub const RED: Rgb<u8> = Rgb([0xf3, 0x8b, 0xa8]);
pub const YELLOW: Rgb<u8> = Rgb([0xf9, 0xe2, 0xaf]);
pub const GREEN: Rgb<u8> = Rgb([0xa6, 0xe3, 0xa1]);

/// Edge length of the master raster every other artifact is resampled from.
pub const MASTER_SIZE: u32 = 1024;

/// Text drawn near the bottom of the icon.
pub const LABEL: &str = "OE";

/// Peak alpha of the highlight band, reached on its first row.
pub const HIGHLIGHT_ALPHA: f64 = 60.0;

/// Edge lengths bundled into the Windows icon, smallest first.
pub const ICO_SIZES: [u32; 7] = [16, 24, 32, 48, 64, 128, 256];

/// File names inside the macOS iconset and the edge length each one carries.
pub const ICONSET_ENTRIES: [(&str, u32); 10] = [
    ("icon_16x16.png", 16),
    ("icon_16x16@2x.png", 32),
    ("icon_32x32.png", 32),
    ("icon_32x32@2x.png", 64),
    ("icon_128x128.png", 128),
    ("icon_128x128@2x.png", 256),
    ("icon_256x256.png", 256),
    ("icon_256x256@2x.png", 512),
    ("icon_512x512.png", 512),
    ("icon_512x512@2x.png", 1024),
];

/// Every length used by the drawing passes, derived from the canvas edge.
///
/// All values are truncated fractions of `size`, so a given size always
/// yields the same integer layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconGeometry {
    pub size: i64,
    pub margin: i64,
    pub radius: i64,
    pub inner_margin: i64,
    pub inner_radius: i64,
    /// Number of rows covered by the highlight band.
    pub band_rows: i64,
    /// Unrounded band height used as the interpolation denominator.
    pub band_extent: f64,
    pub chevron: i64,
    pub stroke: i64,
    pub chev_x: i64,
    pub chev_y: i64,
    pub cursor_x: i64,
    pub cursor_y: i64,
    pub cursor_w: i64,
    pub cursor_h: i64,
    pub cursor_radius: i64,
    pub dot_radius: i64,
    pub dot_x: i64,
    pub dot_y: i64,
    pub dot_spacing: i64,
    pub font_size: i64,
    pub label_shift: i64,
    pub label_y: i64,
}

fn frac(size: i64, fraction: f64) -> i64 {
    (size as f64 * fraction) as i64
}

impl IconGeometry {
    pub fn for_size(size: u32) -> Self {
        let size = i64::from(size);
        let margin = frac(size, 0.06);
        let centre = size / 2;
        let chevron = frac(size, 0.28);
        let stroke = frac(size, 0.065);
        let chev_x = centre - frac(size, 0.12);
        let chev_y = centre - frac(size, 0.04);

        IconGeometry {
            size,
            margin,
            radius: frac(size, 0.18),
            inner_margin: frac(size, 0.08),
            inner_radius: frac(size, 0.15),
            band_rows: frac(size, 0.08),
            band_extent: size as f64 * 0.08,
            chevron,
            stroke,
            chev_x,
            chev_y,
            cursor_x: chev_x + chevron + frac(size, 0.08),
            cursor_y: chev_y + chevron / 2 - stroke,
            cursor_w: frac(size, 0.12),
            cursor_h: stroke + 4,
            cursor_radius: 4,
            dot_radius: frac(size, 0.018),
            dot_x: margin + frac(size, 0.08),
            dot_y: margin + frac(size, 0.08),
            dot_spacing: frac(size, 0.05),
            font_size: frac(size, 0.08),
            label_shift: frac(size, 0.14),
            label_y: size - margin - frac(size, 0.14),
        }
    }

    /// Vertices of the chevron: upper start, shared vertex, lower start.
    pub fn chevron_points(&self) -> [(i64, i64); 3] {
        let half = self.chevron / 2;
        [
            (self.chev_x, self.chev_y - half),
            (self.chev_x + self.chevron, self.chev_y),
            (self.chev_x, self.chev_y + half),
        ]
    }
}

/// Where the generated artifacts land on disk.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        OutputLayout { root: root.into() }
    }

    /// The `assets/` directory next to the crate manifest.
    pub fn assets() -> Self {
        OutputLayout::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets"))
    }

    pub fn master_png(&self) -> PathBuf {
        self.root.join("icon.png")
    }

    pub fn ico(&self) -> PathBuf {
        self.root.join("icon.ico")
    }

    pub fn iconset_dir(&self) -> PathBuf {
        self.root.join("icon.iconset")
    }
}
