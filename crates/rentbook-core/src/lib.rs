//! # rentbook-core
//!
//! Core data structures for rentbook, a rent and electricity ledger kept in a
//! spreadsheet with one sheet per flat.
//!
//! This crate has no I/O. It provides:
//! - [`SheetRange`] - A1-style ranges (`Flat-1!A7:C`, `Flat-1!E:E`) used to address the grid
//! - [`Block`], [`Record`], [`LedgerEntry`] - the row codec for the rent and electricity blocks
//! - [`paginate`] and [`PageRequest`] - fixed-size pages over newest-first entries
//! - [`total_in_range`] - inclusive month-year window totals over stored rows
//! - [`SummaryRow`] - the per-flat summary projection
//!
//! ## Example
//!
//! ```rust
//! use rentbook_core::{Block, LedgerEntry, SheetRange};
//!
//! let range = SheetRange::block(Block::Electricity, "Flat-1").from_row(7);
//! assert_eq!(range.to_string(), "'Flat-1'!E7:G");
//!
//! let row: Vec<String> = ["01/2024", "5000", "paid", "", "01/2024", "640", ""]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//! let entry = LedgerEntry::decode(&row).unwrap();
//! assert_eq!(entry.rent.month_year, "01/2024");
//! assert!(entry.electricity.is_some());
//! ```

pub mod address;
pub mod aggregate;
pub mod error;
pub mod pagination;
pub mod record;
pub mod summary;

pub use address::{column_to_letters, letters_to_column, SheetRange};
pub use aggregate::{total_in_range, AmountColumn};
pub use error::{Error, Result};
pub use pagination::{newest_first, paginate, Page, PageRequest};
pub use record::{check_rows, parse_amount, Block, LedgerEntry, Record, RECORD_WIDTH};
pub use summary::SummaryRow;

/// Display and identifier value of the synthetic entry covering every flat
pub const ALL_UNITS: &str = "All-Units";

/// Maximum number of rows in a sheet
pub const MAX_ROWS: u32 = 10_000_000;

/// Maximum number of columns in a sheet
pub const MAX_COLS: u16 = 18_278;
