//! Error types for the ledger services

use rentbook_core::Error as CoreError;
use rentbook_grid::GridError;
use thiserror::Error;

/// Result type alias using [`LedgerError`]
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors surfaced by the ledger services
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Request rejected before touching the grid
    #[error("{0}")]
    Validation(String),

    /// Record, range or paging error from the core types
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The grid service call failed; its message is passed through
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Coarse classification used at the HTTP boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Upstream,
}

impl LedgerError {
    /// Create a validation error with a message
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        LedgerError::Validation(msg.into())
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Validation(_) => ErrorKind::Validation,
            LedgerError::Core(CoreError::NotFound(_)) => ErrorKind::NotFound,
            LedgerError::Core(
                CoreError::InvalidRecord(_)
                | CoreError::InvalidPage(_)
                | CoreError::InvalidAddress(_)
                | CoreError::InvalidRange(_)
                | CoreError::RowOutOfBounds(..),
            ) => ErrorKind::Validation,
            LedgerError::Core(CoreError::Other(_)) | LedgerError::Grid(_) => ErrorKind::Upstream,
        }
    }
}
