//! Ledger rows and the two record blocks they carry
//!
//! Every data row of a flat's sheet holds up to two records side by side:
//!
//! ```text
//!   A          B       C     | D |  E          F       G
//!   month-year amount  note  |   |  month-year amount  note
//!   \______ rent ________/   sep   \____ electricity ____/
//! ```
//!
//! A row may hold either block, both, or neither. The blocks never overlap.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Number of cells in a record block (key, amount, note)
pub const RECORD_WIDTH: usize = 3;

/// Column kept empty between the rent and electricity blocks
pub const SEPARATOR_COL: u16 = 3;

/// One of the two record kinds stored in a ledger row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Block {
    /// Monthly rent, columns A..C
    Rent,
    /// Monthly electricity bill, columns E..G
    Electricity,
}

impl Block {
    /// Select the block from an `isElectricBill` style flag
    pub fn from_flag(is_electric_bill: bool) -> Self {
        if is_electric_bill {
            Block::Electricity
        } else {
            Block::Rent
        }
    }

    /// First column of the block (its key column)
    pub const fn first_col(self) -> u16 {
        match self {
            Block::Rent => 0,
            Block::Electricity => SEPARATOR_COL + 1,
        }
    }

    /// Last column of the block (inclusive)
    pub const fn last_col(self) -> u16 {
        self.first_col() + RECORD_WIDTH as u16 - 1
    }

    /// Human readable name
    pub fn name(self) -> &'static str {
        match self {
            Block::Rent => "rent",
            Block::Electricity => "electricity",
        }
    }

    /// Slice this block's cells out of a full ledger row
    ///
    /// Short rows yield a short (possibly empty) slice.
    pub fn cells(self, row: &[String]) -> &[String] {
        let start = (self.first_col() as usize).min(row.len());
        let end = (start + RECORD_WIDTH).min(row.len());
        &row[start..end]
    }
}

/// A single rent or electricity entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Month-year key, stored verbatim in the block's first cell
    pub month_year: String,
    /// Amount; unparseable cells read as zero
    pub amount: Decimal,
    /// Free-form note
    pub note: String,
}

impl Record {
    /// Read a record from the cells of one block. Missing cells default to
    /// empty strings and a zero amount.
    pub fn from_cells(cells: &[String]) -> Self {
        let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
        Self {
            month_year: cell(0),
            amount: parse_amount(&cell(1)),
            note: cell(2),
        }
    }

    /// Check whether the key cell holds anything
    pub fn has_key(&self) -> bool {
        !self.month_year.trim().is_empty()
    }
}

/// One decoded ledger row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    /// Rent block, always present
    #[serde(rename = "rentData")]
    pub rent: Record,
    /// Electricity block, present only when its key cell is filled
    #[serde(rename = "electricityData", skip_serializing_if = "Option::is_none")]
    pub electricity: Option<Record>,
}

impl LedgerEntry {
    /// Decode a full ledger row
    ///
    /// Returns `None` for rows where neither block carries a key.
    pub fn decode(row: &[String]) -> Option<Self> {
        let rent = Record::from_cells(Block::Rent.cells(row));
        let electricity = Some(Record::from_cells(Block::Electricity.cells(row)))
            .filter(Record::has_key);

        if !rent.has_key() && electricity.is_none() {
            return None;
        }
        Some(Self { rent, electricity })
    }

    /// Decode every row, dropping rows without any key. Order is preserved.
    pub fn decode_all<R: AsRef<[String]>>(rows: &[R]) -> Vec<Self> {
        rows.iter()
            .filter_map(|row| Self::decode(row.as_ref()))
            .collect()
    }
}

/// Parse an amount cell permissively
///
/// Accepts plain and scientific decimal notation after trimming; anything
/// else (including an empty cell) is zero.
pub fn parse_amount(cell: &str) -> Decimal {
    let cell = cell.trim();
    if cell.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(cell)
        .or_else(|_| Decimal::from_scientific(cell))
        .unwrap_or(Decimal::ZERO)
}

/// Validate rows before they are written into a record block
///
/// Every row needs a non-empty key cell and at most [`RECORD_WIDTH`] cells, so
/// a write can neither add a keyless record nor spill into the next block.
pub fn check_rows<R: AsRef<[String]>>(rows: &[R]) -> Result<()> {
    if rows.is_empty() {
        return Err(Error::InvalidRecord("no rows to write".into()));
    }
    for (i, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if row.len() > RECORD_WIDTH {
            return Err(Error::InvalidRecord(format!(
                "row {} has {} cells, a record holds at most {}",
                i + 1,
                row.len(),
                RECORD_WIDTH
            )));
        }
        if row.first().map_or(true, |key| key.trim().is_empty()) {
            return Err(Error::InvalidRecord(format!(
                "row {} has an empty month-year key",
                i + 1
            )));
        }
    }
    Ok(())
}
