//! Convenient re-exports
//!
//! ```rust
//! use rentbook::prelude::*;
//! ```

pub use crate::{
    ErrorKind, LedgerError, LedgerLayout, RecentEntries, Rentbook, Result, Target, UnitOption,
};
pub use rentbook_core::{Block, LedgerEntry, Page, PageRequest, Record, SummaryRow, ALL_UNITS};
pub use rentbook_grid::{GridAdapter, Rows, WriteAck};
