//! Key wrapper for the `images` tree
//!
//! Image names are stored bincode-encoded so every key in the tree has the
//! same framing and decodes back to the exact name.

use super::error::DbError;

/// An image name used as a database key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageKey(String);

impl ImageKey {
    /// # Errors
    ///
    /// Returns `DbError::InvalidInput` for an empty name.
    pub fn new(name: impl Into<String>) -> Result<Self, DbError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DbError::InvalidInput("image name cannot be empty".into()));
        }
        Ok(Self(name))
    }

    /// # Errors
    ///
    /// Returns `DbError` if the bytes cannot be decoded into a name.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DbError> {
        let (name, _): (String, usize) =
            bincode::decode_from_slice(bytes, bincode::config::standard())?;
        Ok(Self(name))
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<&ImageKey> for Vec<u8> {
    type Error = DbError;

    fn try_from(key: &ImageKey) -> Result<Self, Self::Error> {
        Ok(bincode::encode_to_vec(&key.0, bincode::config::standard())?)
    }
}

impl std::ops::Deref for ImageKey {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
