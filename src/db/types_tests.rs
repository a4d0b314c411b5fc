//! Unit tests for database key types

#[cfg(test)]
mod tests {
    use crate::db::error::DbError;
    use crate::db::types::ImageKey;

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(ImageKey::new(""), Err(DbError::InvalidInput(_))));
    }

    #[test]
    fn test_key_bytes_decode_to_same_name() {
        for name in ["Rock_BaseColor.png", ".hidden.png", "Ünïcode Wall.tga"] {
            let key = ImageKey::new(name).unwrap();
            let bytes: Vec<u8> = (&key).try_into().unwrap();
            assert!(!bytes.is_empty());
            assert_eq!(ImageKey::from_bytes(&bytes).unwrap(), key);
        }
    }

    #[test]
    fn test_deref_to_str() {
        let key = ImageKey::new("Sky.png").unwrap();
        assert!(key.ends_with(".png"));
        assert_eq!(key.into_inner(), "Sky.png");
    }
}
