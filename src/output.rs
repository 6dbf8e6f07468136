//! PNG output and sign file naming

use image::RgbaImage;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Save an RGBA image as PNG, creating parent directories as needed.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Output path for a sign: `<out_dir>/<name>.png`.
///
/// Sign names carry `+`, `-` and `#`, which are kept as-is.
pub fn sign_path(out_dir: &Path, sign_name: &str) -> PathBuf {
    out_dir.join(format!("{}.png", sign_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::tempdir;

    #[test]
    fn test_sign_path_detailed() {
        let path = sign_path(Path::new("output"), "sh1+03+");
        assert_eq!(path, PathBuf::from("output/sh1+03+.png"));
    }

    #[test]
    fn test_sign_path_mirrored() {
        let path = sign_path(Path::new("build/signs"), "dh2-06-#");
        assert_eq!(path, PathBuf::from("build/signs/dh2-06-#.png"));
    }

    #[test]
    fn test_save_png_basic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.png");

        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([255, 255, 255, 255]));

        save_png(&image, &path).unwrap();
        assert!(path.exists());

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (2, 1));
        assert_eq!(*loaded.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*loaded.get_pixel(1, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_save_png_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = sign_path(&dir.path().join("nested/dirs"), "sh1+00+#");

        save_png(&RgbaImage::new(1, 1), &path).unwrap();
        assert!(path.exists());
    }
}
