//! Error types for workbook ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a workbook or scanning folders.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Workbook file does not exist.
    #[error("workbook not found: {path}")]
    WorkbookNotFound { path: PathBuf },

    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Workbook Errors ===
    /// The spreadsheet could not be opened or is not a supported format.
    #[error("failed to open workbook {path}: {source}")]
    WorkbookOpen {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// A worksheet listed by the workbook could not be read.
    #[error("failed to read worksheet '{worksheet}': {message}")]
    WorksheetRead { worksheet: String, message: String },

    /// Requested worksheet is not part of the workbook.
    #[error("worksheet not found: '{worksheet}'")]
    WorksheetNotFound { worksheet: String },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
