//! Capture error types

use thiserror::Error;

use crate::storage::StorageError;

/// Errors raised by one submission attempt
#[derive(Error, Debug)]
pub enum CaptureError {
    /// No signature has been drawn
    #[error("Please sign the log before saving")]
    MissingSignature,

    /// Every reading is blank
    #[error("Enter at least one valid temperature")]
    NoValidReading,

    /// A reading is filled in but is not a number
    #[error("Invalid temperature for {fridge}: {raw:?}")]
    InvalidReading { fridge: String, raw: String },

    /// A previous submission is still saving or being displayed
    #[error("A submission is already in progress")]
    Busy,

    /// The signature surface could not be rasterized
    #[error("Signature error: {0}")]
    Signature(String),

    /// The log could not be persisted
    #[error("Could not save the log: {0}")]
    Storage(#[from] StorageError),
}

impl CaptureError {
    /// Validation failures leave every store untouched and are reported
    /// directly to the user
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CaptureError::MissingSignature
                | CaptureError::NoValidReading
                | CaptureError::InvalidReading { .. }
        )
    }
}

/// Result type alias for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;
