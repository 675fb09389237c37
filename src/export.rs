use crate::models::{OutputLayout, ICONSET_ENTRIES, ICO_SIZES};
use crate::utils::{ensure_dir, file_sha256, progress, save_png};
use ico::{IconDir, IconDirEntry, IconImage, ResourceType};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use log::debug;
use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Resamples `master` to `size`x`size` with a Lanczos filter.
pub fn resample(master: &RgbaImage, size: u32) -> RgbaImage {
    debug!("Resampling {}x{} -> {}x{}", master.width(), master.height(), size, size);
    imageops::resize(master, size, size, FilterType::Lanczos3)
}

/// Writes the master PNG, the Windows icon and the macOS iconset under `layout`.
///
/// Returns every file written, in order. The first failure aborts the run.
pub fn export(master: &RgbaImage, layout: &OutputLayout) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    ensure_dir(&layout.root)?;
    let mut written = Vec::new();

    let master_path = layout.master_png();
    save_png(master, &master_path)?;
    report_saved(&master_path)?;
    written.push(master_path);

    progress("Generating Windows .ico...");
    let ico_path = layout.ico();
    write_ico(master, &ico_path)?;
    report_saved(&ico_path)?;
    written.push(ico_path);

    progress("Generating macOS iconset...");
    let iconset_dir = layout.iconset_dir();
    written.extend(write_iconset(master, &iconset_dir)?);
    progress(&format!("  Iconset created: {}", iconset_dir.display()));
    progress(&format!(
        "  Run: iconutil -c icns {} -o {}",
        iconset_dir.display(),
        layout.root.join("icon.icns").display()
    ));

    Ok(written)
}

/// Packs one resampled copy per entry of [`ICO_SIZES`] into a single icon file.
pub fn write_ico(master: &RgbaImage, path: &Path) -> Result<(), Box<dyn Error>> {
    let mut icon_dir = IconDir::new(ResourceType::Icon);
    for &size in &ICO_SIZES {
        let resized = resample(master, size);
        let image = IconImage::from_rgba_data(size, size, resized.into_raw());
        icon_dir.add_entry(IconDirEntry::encode(&image)?);
    }
    let mut file = BufWriter::new(File::create(path)?);
    icon_dir.write(&mut file)?;
    file.flush()?;
    Ok(())
}

/// Writes the ten named PNGs of a macOS iconset into `dir`.
pub fn write_iconset(master: &RgbaImage, dir: &Path) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    ensure_dir(dir)?;
    let mut written = Vec::with_capacity(ICONSET_ENTRIES.len());
    for (name, size) in ICONSET_ENTRIES {
        let path = dir.join(name);
        save_png(&resample(master, size), &path)?;
        debug!("Wrote {} ({}x{})", path.display(), size, size);
        written.push(path);
    }
    Ok(written)
}

fn report_saved(path: &Path) -> Result<(), Box<dyn Error>> {
    let digest = file_sha256(path)?;
    progress(&format!("  Saved: {} (sha256 {})", path.display(), &digest[..16]));
    Ok(())
}
