//! Testing utilities for pakpal
//!
//! Helper types and functions for writing tests: a `TestDb` wrapper for
//! temporary stores and fixtures for image records and image files.
//!
//! Only available when compiled with `cfg(test)`.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use tempfile::TempDir;

use crate::ImageRecord;
use crate::db::Database;

/// Wrapper for a temporary test store that is removed on drop
///
/// # Examples
/// ```ignore
/// let test_db = TestDb::new();
/// let db = test_db.db();
/// db.set_annotation("Rock.png", &ImageAnnotation::default()).unwrap();
/// assert_eq!(db.count(), 1);
/// // Store removed when test_db is dropped
/// ```
pub struct TestDb {
    // dropped after `db`, so sled is closed before the directory goes
    db: Database,
    _dir: TempDir,
}

impl TestDb {
    /// Create a new empty store in a temporary directory
    ///
    /// # Panics
    /// Panics if the directory or the store cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db = Database::open(dir.path().join("store")).expect("Failed to open test database");
        Self { db, _dir: dir }
    }

    /// Get a reference to the underlying store
    #[must_use]
    pub const fn db(&self) -> &Database {
        &self.db
    }

    /// Get the path to the test store
    #[must_use]
    pub fn path(&self) -> &Path {
        self.db.path()
    }
}

impl Default for TestDb {
    fn default() -> Self {
        Self::new()
    }
}

/// Image records with default annotations, paths under `/library`
#[must_use]
pub fn images(names: &[&str]) -> Vec<ImageRecord> {
    names
        .iter()
        .map(|name| ImageRecord::new(*name, PathBuf::from("/library").join(name)))
        .collect()
}

/// Write a solid-color RGBA PNG
///
/// # Panics
/// Panics if the file cannot be written.
pub fn write_png(path: &Path, width: u32, height: u32, pixel: [u8; 4]) {
    RgbaImage::from_pixel(width, height, Rgba(pixel))
        .save_with_format(path, image::ImageFormat::Png)
        .expect("Failed to write test image");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_basic() {
        let test_db = TestDb::new();
        assert_eq!(test_db.db().count(), 0);
        assert!(test_db.path().exists());
    }

    #[test]
    fn test_db_cleanup() {
        let path = {
            let test_db = TestDb::new();
            test_db.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_write_png() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("red.png");
        write_png(&path, 3, 2, [255, 0, 0, 255]);

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 1).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_images_fixture() {
        let imgs = images(&["A.png", ".B.png"]);
        assert_eq!(imgs[0].path, PathBuf::from("/library/A.png"));
        assert!(imgs[1].is_hidden());
    }
}
