use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SorterError {
    // Category configuration errors
    #[error("Invalid slot {0}: slots are numbered 1 to 9")]
    InvalidSlot(u8),

    #[error("Slot {0} is already assigned to a category")]
    SlotTaken(u8),

    #[error("Category label for slot {0} must not be empty")]
    EmptyLabel(u8),

    #[error("Invalid destination {path}: {reason}")]
    InvalidDestination { path: PathBuf, reason: String },

    // Session errors
    #[error("Slot {0} is not configured")]
    NotConfigured(u8),

    #[error("Destination already contains {0}")]
    DestinationConflict(PathBuf),

    #[error("File no longer exists: {0}")]
    FileMissing(PathBuf),

    #[error("Failed to move {from} to {to}: {reason}")]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Corrupt image {path}: {reason}")]
    CorruptFile { path: PathBuf, reason: String },

    #[error("All photos in this session have been handled")]
    SessionComplete,

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walker error: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    // Configuration file errors
    #[error("Config file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    // Generic errors
    #[error("Argument error: {0}")]
    Argument(String),
}

impl SorterError {
    /// Whether the error is raised while building the category registry.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            SorterError::InvalidSlot(_)
                | SorterError::SlotTaken(_)
                | SorterError::EmptyLabel(_)
                | SorterError::InvalidDestination { .. }
        )
    }
}

/// Result type for photosorter operations.
pub type Result<T> = std::result::Result<T, SorterError>;
