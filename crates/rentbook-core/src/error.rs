//! Error types for rentbook-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in rentbook-core
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid sheet range format
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Row number out of bounds
    #[error("Row {0} out of bounds (max: {1})")]
    RowOutOfBounds(u32, u32),

    /// Rows rejected before they are written to a block
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Page or page size rejected before paginating
    #[error("Invalid page or pageSize values: {0}")]
    InvalidPage(String),

    /// No row carries the requested key
    #[error("No matching entry found for '{0}'.")]
    NotFound(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
