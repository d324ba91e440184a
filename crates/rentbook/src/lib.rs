//! # rentbook
//!
//! Rent and electricity ledgers kept in a spreadsheet, one sheet per flat.
//!
//! Every flat sheet holds ledger rows from row 7 down, with the rent record in
//! columns A..C and the electricity record in E..G of the same row. A
//! `Summary` sheet carries one row of totals per flat and a `FinancialReport`
//! sheet lists monthly amounts per flat.
//!
//! The services here never own a grid client; one is injected as an
//! `Arc<dyn GridAdapter>` so the same code runs against Google Sheets or the
//! in-memory grid.
//!
//! - [`LedgerStore`] - append, find, update and clear records by month-year key
//! - [`SheetCatalog`] - the list of flats
//! - [`SummaryProjection`] - summary rows, summary updates, last entry dates
//! - [`FinancialReport`] - totals over a month range
//! - [`Rentbook`] - all of the above plus production/demo target selection

pub mod book;
pub mod catalog;
pub mod error;
pub mod layout;
pub mod prelude;
pub mod report;
pub mod store;
pub mod summary;

pub use book::{RecentEntries, Rentbook};
pub use catalog::{SheetCatalog, UnitOption};
pub use error::{ErrorKind, LedgerError, Result};
pub use layout::{LedgerLayout, Target};
pub use report::FinancialReport;
pub use store::LedgerStore;
pub use summary::SummaryProjection;

// Re-export the crates callers need to talk to us
pub use rentbook_core as core;
pub use rentbook_grid as grid;
