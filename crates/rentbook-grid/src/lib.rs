//! Grid service adapters for rentbook.
//!
//! The ledger keeps its data in a remote, range-addressed grid: a spreadsheet
//! identified by an id, partitioned into named sheets, read and written with
//! A1 ranges. This crate defines that boundary as the [`GridAdapter`] trait and
//! ships two implementations:
//!
//! - [`SheetsClient`] talks to the Google Sheets v4 REST API
//! - [`MemoryGrid`] keeps everything in process, for tests and local runs
//!
//! # Architecture
//!
//! ```text
//! rentbook (LedgerStore, SheetCatalog, ...)
//!     └── Arc<dyn GridAdapter> (this crate)
//!           ├── SheetsClient ── HTTPS ── sheets.googleapis.com
//!           └── MemoryGrid
//! ```
//!
//! # Example
//!
//! ```rust
//! use rentbook_core::SheetRange;
//! use rentbook_grid::{GridAdapter, MemoryGrid};
//!
//! # async fn example() -> rentbook_grid::Result<()> {
//! let grid = MemoryGrid::new().with_sheet("book", "Flat-1", vec![]);
//! let range = SheetRange::parse("'Flat-1'!A7")?;
//! grid.append("book", &range, vec![vec!["01/2024".into(), "5000".into()]]).await?;
//!
//! let rows = grid.get("book", &SheetRange::parse("'Flat-1'!A7:C")?).await?;
//! assert_eq!(rows, vec![vec!["01/2024".to_string(), "5000".to_string()]]);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod error;
pub mod memory;
pub mod sheets;

pub use adapter::{GridAdapter, Rows, WriteAck};
pub use error::{GridError, Result};
pub use memory::MemoryGrid;
pub use sheets::{SheetsClient, SheetsConfig};
