//! Storage error types
//!
//! Defines all errors that can occur in the storage layer.

use thiserror::Error;

/// Errors that can occur while reading or writing persisted records
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Key is not usable as a record name
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Embedded image data could not be encoded or decoded
    #[error("Image error: {0}")]
    Image(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::InvalidKey("../etc".to_string());
        assert_eq!(err.to_string(), "Invalid key: ../etc");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let storage_err: StorageError = io_err.into();
        assert!(matches!(storage_err, StorageError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let storage_err: StorageError = json_err.into();
        assert!(matches!(storage_err, StorageError::Serialization(_)));
    }
}
