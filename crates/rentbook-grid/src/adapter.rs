//! The range-addressed grid boundary.

use async_trait::async_trait;
use rentbook_core::SheetRange;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Cell values as read from or written to the grid, row by row.
///
/// Rows read back are trimmed the way the grid service trims them: trailing
/// empty cells and trailing empty rows are dropped, inner empty rows stay as
/// empty vectors.
pub type Rows = Vec<Vec<String>>;

/// Acknowledgement of a write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteAck {
    #[serde(default)]
    pub updated_rows: u32,
    #[serde(default)]
    pub updated_cells: u32,
}

/// A remote spreadsheet store addressed by `(spreadsheet id, range)`.
///
/// Implementations are shared across requests behind an `Arc`, so every
/// method takes `&self`. Nothing here is transactional: a read followed by a
/// positional write can race with another writer.
#[async_trait]
pub trait GridAdapter: Send + Sync {
    /// Read the values in `range`.
    async fn get(&self, spreadsheet_id: &str, range: &SheetRange) -> Result<Rows>;

    /// Append `rows` below the last row holding data in the table at `range`.
    async fn append(&self, spreadsheet_id: &str, range: &SheetRange, rows: Rows)
        -> Result<WriteAck>;

    /// Overwrite the cells of `range`, starting at its top-left corner.
    async fn update(&self, spreadsheet_id: &str, range: &SheetRange, rows: Rows)
        -> Result<WriteAck>;

    /// Sheet names in the order the spreadsheet lists them.
    async fn list_sheets(&self, spreadsheet_id: &str) -> Result<Vec<String>>;
}
