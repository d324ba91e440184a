//! Error types for grid adapters.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The grid service answered with an error status; `message` is its own text.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("invalid grid service URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Spreadsheet not found: {0}")]
    SpreadsheetNotFound(String),

    #[error("Unable to parse range: {0}")]
    SheetNotFound(String),

    #[error("Range {range} cannot hold {rows} row(s) of {cols} cell(s)")]
    RangeTooSmall { range: String, rows: usize, cols: usize },

    #[error(transparent)]
    Address(#[from] rentbook_core::Error),
}

pub type Result<T> = std::result::Result<T, GridError>;
