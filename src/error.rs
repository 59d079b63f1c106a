//! Error types for ShelfDB
//!
//! Provides a unified error type for all catalog operations.

use thiserror::Error;

/// Result type alias using ShelfError
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Unified error type for ShelfDB operations
#[derive(Debug, Error)]
pub enum ShelfError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A slot read returned fewer bytes than the fixed record size
    #[error("Incomplete read at offset {offset}: expected {expected} bytes, got {got}")]
    IncompleteRead {
        offset: u64,
        expected: usize,
        got: usize,
    },

    // -------------------------------------------------------------------------
    // Catalog Errors
    // -------------------------------------------------------------------------
    #[error("Book with id {id} not found")]
    NotFound { id: i32 },

    #[error("Book with id {id} already exists")]
    DuplicateKey { id: i32 },

    #[error("No books match {field} = '{value}'")]
    NoMatches { field: String, value: String },

    #[error("Unknown search field: {0}")]
    UnknownField(String),

    // -------------------------------------------------------------------------
    // Exchange Errors
    // -------------------------------------------------------------------------
    #[error("Malformed input at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    /// First hard failure of a bulk import; `imported` records were already applied
    #[error("Import stopped at line {line} after {imported} records: {source}")]
    Import {
        line: usize,
        imported: usize,
        #[source]
        source: Box<ShelfError>,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ShelfError {
    /// Number of records applied before a bulk import failed (0 for other errors)
    pub fn imported(&self) -> usize {
        match self {
            ShelfError::Import { imported, .. } => *imported,
            _ => 0,
        }
    }
}
