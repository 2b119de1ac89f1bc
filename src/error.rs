//! Error types for the lesson editor
//!
//! Selection-absent commands are not errors; they are silent no-ops.
//! Everything here is local to the operation that raised it and never
//! fatal to the editing session.

use thiserror::Error;

/// Top-level editor error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    /// Command name outside the supported formatting set
    #[error("Unknown editor command: {0}")]
    UnknownCommand(String),

    /// A color command was invoked without its color value
    #[error("Command '{0}' requires a value")]
    MissingValue(String),

    #[error("Invalid color value: '{0}'")]
    InvalidColor(String),

    #[error("Invalid style value for {field}: '{value}'")]
    InvalidStyle { field: String, value: String },

    /// Table dimensions outside 1..=max
    #[error("Invalid table dimensions {rows}x{cols} (each must be between 1 and {max})")]
    InvalidDimensions { rows: usize, cols: usize, max: usize },

    #[error("Refusing to insert link with unsafe URL: '{0}'")]
    UnsafeUrl(String),

    #[error("File '{name}' is not an image (type: {mime_type})")]
    NotAnImage { name: String, mime_type: String },

    #[error("No pending upload with id {0}")]
    UnknownUpload(String),

    #[error("Image upload failed: {0}")]
    Upload(#[from] StorageError),

    #[error("Unknown dialog field: {0}")]
    UnknownDialogField(String),

    #[error("Draft persistence failed: {0}")]
    Draft(String),

    #[error("Invalid editor configuration: {0}")]
    Config(String),
}

/// Failures reported by the blob storage collaborator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("network error: {0}")]
    Network(String),

    #[error("storage rejected the upload: {0}")]
    Rejected(String),
}

pub type EditorResult<T> = Result<T, EditorError>;
