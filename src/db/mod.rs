//! Project store for pakpal
//!
//! Each project owns one sled database with two trees:
//! - `images`: image name -> `ImageAnnotation`
//! - `meta`: the project's `FileData` under the key `file_data`
//!
//! Values are encoded with bincode through serde.

use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sled::{Db, Tree};

use crate::session::FileData;
use crate::{ImageAnnotation, ImageRecord};

pub mod error;
pub mod types;

pub use error::DbError;
pub use types::ImageKey;

const FILE_DATA_KEY: &[u8] = b"file_data";

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, DbError> {
    Ok(bincode::serde::encode_to_vec(value, bincode::config::standard())?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DbError> {
    let (value, _) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
    Ok(value)
}

/// Database wrapper that encapsulates all store operations
pub struct Database {
    db: Db,
    path: PathBuf,
    images: Tree,
    meta: Tree,
}

impl Database {
    /// Opens or creates a store at the specified path
    ///
    /// # Examples
    /// ```no_run
    /// use pakpal::db::Database;
    /// let db = Database::open("castle_store").unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the database cannot be opened or if the internal trees cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let db = sled::open(&path)?;
        let images = db.open_tree("images")?;
        let meta = db.open_tree("meta")?;
        Ok(Self {
            db,
            path: path.as_ref().to_path_buf(),
            images,
            meta,
        })
    }

    /// Directory the store lives in
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether project data has been written
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the lookup fails.
    pub fn is_initialized(&self) -> Result<bool, DbError> {
        Ok(self.meta.contains_key(FILE_DATA_KEY)?)
    }

    /// Read the project's file data
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotInitialized` when the store holds no project data,
    /// or a decode error when the stored value is unreadable.
    pub fn load_file_data(&self) -> Result<FileData, DbError> {
        match self.meta.get(FILE_DATA_KEY)? {
            Some(value) => decode(&value),
            None => Err(DbError::NotInitialized(self.path.display().to_string())),
        }
    }

    /// Write the project's file data
    ///
    /// # Errors
    ///
    /// Returns `DbError` if encoding or the write fails.
    pub fn save_file_data(&self, data: &FileData) -> Result<(), DbError> {
        self.meta.insert(FILE_DATA_KEY, encode(data)?)?;
        Ok(())
    }

    /// Get the annotation stored for an image
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the name is empty, the lookup fails or the value
    /// cannot be decoded.
    pub fn get_annotation(&self, name: &str) -> Result<Option<ImageAnnotation>, DbError> {
        let key: Vec<u8> = (&ImageKey::new(name)?).try_into()?;
        self.images.get(key)?.map(|value| decode(&value)).transpose()
    }

    /// Store the annotation of an image, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the name is empty, encoding or the write fails.
    pub fn set_annotation(&self, name: &str, annotation: &ImageAnnotation) -> Result<(), DbError> {
        let key: Vec<u8> = (&ImageKey::new(name)?).try_into()?;
        self.images.insert(key, encode(annotation)?)?;
        Ok(())
    }

    /// Remove the annotation of an image; returns whether one existed
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the name is empty or the removal fails.
    pub fn remove_annotation(&self, name: &str) -> Result<bool, DbError> {
        let key: Vec<u8> = (&ImageKey::new(name)?).try_into()?;
        Ok(self.images.remove(key)?.is_some())
    }

    /// All stored annotations keyed by image name, in key order
    ///
    /// # Errors
    ///
    /// Returns `DbError` if iteration or decoding fails.
    pub fn annotations(&self) -> Result<Vec<(String, ImageAnnotation)>, DbError> {
        let mut all = Vec::new();
        for result in &self.images {
            let (key, value) = result?;
            let name = ImageKey::from_bytes(&key)?.into_inner();
            all.push((name, decode(&value)?));
        }
        Ok(all)
    }

    /// Fill in the stored annotation of every record
    ///
    /// Images without a stored annotation get the default one.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if a lookup fails.
    pub fn annotate(&self, images: &mut [ImageRecord]) -> Result<(), DbError> {
        for image in images {
            image.annotation = self.get_annotation(&image.name)?.unwrap_or_default();
        }
        Ok(())
    }

    /// Store the annotation of every record
    ///
    /// Default annotations are removed instead of stored.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if a write fails.
    pub fn store_annotations(&self, images: &[ImageRecord]) -> Result<(), DbError> {
        for image in images {
            if image.annotation == ImageAnnotation::default() {
                self.remove_annotation(&image.name)?;
            } else {
                self.set_annotation(&image.name, &image.annotation)?;
            }
        }
        Ok(())
    }

    /// Drop annotations of images that are no longer in `images`
    ///
    /// Returns the number of removed entries.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if iteration or removal fails.
    pub fn prune_annotations(&self, images: &[ImageRecord]) -> Result<usize, DbError> {
        let mut removed = 0;
        for (name, _) in self.annotations()? {
            if !images.iter().any(|i| i.name == name) {
                self.remove_annotation(&name)?;
                removed += 1;
            }
        }
        if removed > 0 {
            debug!("Pruned {removed} stale annotation(s)");
        }
        Ok(removed)
    }

    /// Get the number of stored annotations
    #[must_use]
    pub fn count(&self) -> usize {
        self.images.len()
    }

    /// Remove every annotation, keeping the project data
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the tree cannot be cleared.
    pub fn clear_annotations(&self) -> Result<(), DbError> {
        self.images.clear()?;
        Ok(())
    }

    /// Remove all data from the store
    ///
    /// # Errors
    ///
    /// Returns `DbError` if a tree cannot be cleared.
    pub fn clear(&self) -> Result<(), DbError> {
        self.images.clear()?;
        self.meta.clear()?;
        Ok(())
    }

    /// Flush all pending writes to disk
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the flush fails.
    pub fn flush(&self) -> Result<(), DbError> {
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportLocation;
    use crate::testing::{TestDb, images};
    use crate::LocationId;

    fn annotation() -> ImageAnnotation {
        ImageAnnotation {
            enable_export: true,
            export_location: Some(LocationId::new()),
            export_format: None,
        }
    }

    #[test]
    fn test_uninitialized_store() {
        let test_db = TestDb::new();
        let db = test_db.db();
        assert!(!db.is_initialized().unwrap());
        assert!(matches!(db.load_file_data(), Err(DbError::NotInitialized(_))));
    }

    #[test]
    fn test_file_data_round_trip() {
        let test_db = TestDb::new();
        let db = test_db.db();

        let mut data = FileData::new("castle", "/tmp/castle/textures");
        data.enable_hidden = true;
        data.locations.push(ExportLocation::new("Out", "//export/^bundle_name^"));
        data.selection.cursor = 3;
        db.save_file_data(&data).unwrap();

        assert!(db.is_initialized().unwrap());
        let loaded = db.load_file_data().unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_annotation_crud() {
        let test_db = TestDb::new();
        let db = test_db.db();
        let a = annotation();

        assert_eq!(db.get_annotation("Rock.png").unwrap(), None);
        db.set_annotation("Rock.png", &a).unwrap();
        assert_eq!(db.get_annotation("Rock.png").unwrap(), Some(a.clone()));
        assert_eq!(db.count(), 1);

        db.set_annotation("Stone.png", &a).unwrap();
        assert_eq!(db.get_annotation("Stone.png").unwrap(), Some(a.clone()));
        assert_eq!(db.count(), 2);

        assert!(db.remove_annotation("Stone.png").unwrap());
        assert!(!db.remove_annotation("Stone.png").unwrap());
        assert_eq!(db.count(), 1);
        assert!(db.set_annotation("", &a).is_err());
    }

    #[test]
    fn test_annotate_store_and_prune() {
        let test_db = TestDb::new();
        let db = test_db.db();

        let mut imgs = images(&["A.png", "B.png", "C.png"]);
        imgs[0].annotation = annotation();
        imgs[2].annotation.enable_export = true;
        db.store_annotations(&imgs).unwrap();
        assert_eq!(db.count(), 2);

        let mut fresh = images(&["A.png", "B.png"]);
        db.annotate(&mut fresh).unwrap();
        assert_eq!(fresh[0].annotation, imgs[0].annotation);
        assert_eq!(fresh[1].annotation, ImageAnnotation::default());

        assert_eq!(db.prune_annotations(&fresh).unwrap(), 1);
        let names: Vec<String> = db.annotations().unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["A.png"]);
    }

    #[test]
    fn test_clear_annotations_keeps_file_data() {
        let test_db = TestDb::new();
        let db = test_db.db();
        db.save_file_data(&FileData::new("castle", "/tmp")).unwrap();
        db.set_annotation("A.png", &annotation()).unwrap();

        db.clear_annotations().unwrap();
        assert_eq!(db.count(), 0);
        assert!(db.is_initialized().unwrap());

        db.clear().unwrap();
        assert!(!db.is_initialized().unwrap());
    }
}
