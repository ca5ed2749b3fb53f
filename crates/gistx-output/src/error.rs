//! Error types for artifact generation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while writing survey artifacts. Any of these aborts the
/// remaining packaging steps.
#[derive(Debug, Error)]
pub enum OutputError {
    // === File System Errors ===
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to delete {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// The in-memory XML writer failed.
    #[error("failed to serialize XML: {0}")]
    XmlWrite(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An emitted document did not parse back.
    #[error("{file} is not well-formed XML: {message}")]
    MalformedXml { file: String, message: String },

    #[error("failed to serialize manifest: {0}")]
    Json(#[from] serde_json::Error),

    // === Packaging Errors ===
    #[error("failed to build zip {path}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;
