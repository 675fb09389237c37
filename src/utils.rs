use chrono::Local;
use image::{ImageFormat, RgbaImage};
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

/// Prints a timestamped progress line.
pub fn progress(message: &str) {
    println!("[{}] {}", Local::now().format("%H:%M:%S"), message);
}

/// Calculates the SHA256 hash of a file.
pub fn file_sha256(path: &Path) -> Result<String, Box<dyn Error>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    let mut buffer = vec![0; 8192]; // 8KB buffer
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Creates `path` and any missing parents. Existing directories are left alone.
pub fn ensure_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path)?;
    Ok(())
}

/// Writes `image` as a PNG, replacing any file already at `path`.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), Box<dyn Error>> {
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn scratch(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("iconforge-utils-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn hashes_match_known_digest() {
        let dir = scratch("hash");
        ensure_dir(&dir).unwrap();
        let path = dir.join("abc.txt");
        fs::write(&path, b"abc").unwrap();
        assert_eq!(
            file_sha256(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn hashing_missing_file_fails() {
        assert!(file_sha256(Path::new("/nonexistent/iconforge/file")).is_err());
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let dir = scratch("dirs").join("a").join("b");
        ensure_dir(&dir).unwrap();
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
        fs::remove_dir_all(dir.parent().unwrap().parent().unwrap()).unwrap();
    }

    #[test]
    fn png_keeps_alpha() {
        let dir = scratch("png");
        ensure_dir(&dir).unwrap();
        let path = dir.join("px.png");
        let image = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 40]));
        save_png(&image, &path).unwrap();
        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded, image);
        fs::remove_dir_all(&dir).unwrap();
    }
}
