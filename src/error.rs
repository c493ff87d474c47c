//! Error types for pagedb
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::storage::PageId;

/// Result type alias using DbError
pub type Result<T> = std::result::Result<T, DbError>;

/// Unified error type for pagedb operations
#[derive(Debug, Error)]
pub enum DbError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Table Errors
    // -------------------------------------------------------------------------
    #[error("table '{0}' already exists")]
    AlreadyExists(String),

    #[error("table '{0}' does not exist")]
    TableNotFound(String),

    #[error("invalid table name '{0}'")]
    InvalidName(String),

    #[error("column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    #[error("table '{table}' has {expected} columns, got {actual} values")]
    ColumnCountMismatch {
        table: String,
        expected: usize,
        actual: usize,
    },

    // -------------------------------------------------------------------------
    // Page Errors
    // -------------------------------------------------------------------------
    #[error("malformed page data: {0}")]
    Format(String),

    #[error("row of {size} bytes does not fit in an empty page ({capacity} bytes available)")]
    RowTooLarge { size: usize, capacity: usize },

    #[error("table header needs {needed} bytes but page {page_id} holds {capacity}")]
    HeaderOverflow {
        page_id: PageId,
        needed: usize,
        capacity: usize,
    },

    // -------------------------------------------------------------------------
    // Front-end Errors
    // -------------------------------------------------------------------------
    #[error("parse error: {0}")]
    Parse(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("configuration error: {0}")]
    Config(String),
}
