//! Reads and writes of the summary sheet

use std::sync::Arc;

use rentbook_core::summary::{LAST_ENTRY_COL, SUMMARY_WIDTH};
use rentbook_core::{SheetRange, SummaryRow};
use rentbook_grid::{GridAdapter, WriteAck};
use tracing::info;

use crate::error::{LedgerError, Result};
use crate::layout::Target;

/// Columns an update may touch (B..G); the floor name in A is fixed
const EDITABLE_WIDTH: usize = SUMMARY_WIDTH - 1;

/// The per-flat rows of the summary sheet
pub struct SummaryProjection {
    grid: Arc<dyn GridAdapter>,
    sheet: String,
    first_row: u32,
}

impl SummaryProjection {
    pub fn new<S: Into<String>>(grid: Arc<dyn GridAdapter>, sheet: S, first_row: u32) -> Self {
        Self {
            grid,
            sheet: sheet.into(),
            first_row,
        }
    }

    /// `Summary!A2:G{n+1}` for a target with `n` flats
    fn range(&self, target: &Target) -> SheetRange {
        let last = self.first_row + target.summary_units.max(1) - 1;
        SheetRange::columns(self.sheet.as_str(), 0, SUMMARY_WIDTH as u16 - 1)
            .rows(self.first_row, last)
    }

    /// All summary rows of a target, in sheet order
    pub async fn read(&self, target: &Target) -> Result<Vec<SummaryRow>> {
        let rows = self
            .grid
            .get(&target.spreadsheet_id, &self.range(target))
            .await?;
        Ok(rows.iter().map(|row| SummaryRow::from_row(row)).collect())
    }

    /// Summary row of the flat whose floor cell equals `unit`
    pub async fn summary_for(&self, target: &Target, unit: &str) -> Result<Option<SummaryRow>> {
        Ok(self
            .read(target)
            .await?
            .into_iter()
            .find(|row| row.floor == unit))
    }

    /// Overwrite the editable columns (B onwards) of a flat's summary row
    ///
    /// Returns `Ok(None)` when no row belongs to `unit`.
    pub async fn update(
        &self,
        target: &Target,
        unit: &str,
        values: Vec<String>,
    ) -> Result<Option<WriteAck>> {
        if values.is_empty() || values.len() > EDITABLE_WIDTH {
            return Err(LedgerError::validation(format!(
                "a summary update takes 1 to {} values, got {}",
                EDITABLE_WIDTH,
                values.len()
            )));
        }
        let Some(row) = self.row_of(target, unit).await? else {
            return Ok(None);
        };

        let last_col = values.len() as u16;
        let range = SheetRange::columns(self.sheet.as_str(), 1, last_col).rows(row, row);
        let ack = self
            .grid
            .update(&target.spreadsheet_id, &range, vec![values])
            .await?;

        info!(unit, row, "updated summary");
        Ok(Some(ack))
    }

    /// Record `key` as the last entry date of `unit`
    ///
    /// Returns `Ok(None)` when no row belongs to `unit`.
    pub async fn touch_last_entry(
        &self,
        target: &Target,
        unit: &str,
        key: &str,
    ) -> Result<Option<WriteAck>> {
        let Some(row) = self.row_of(target, unit).await? else {
            return Ok(None);
        };
        let range = SheetRange::cell(self.sheet.as_str(), LAST_ENTRY_COL, row);
        let ack = self
            .grid
            .update(&target.spreadsheet_id, &range, vec![vec![key.to_string()]])
            .await?;
        Ok(Some(ack))
    }

    async fn row_of(&self, target: &Target, unit: &str) -> Result<Option<u32>> {
        let range = SheetRange::columns(self.sheet.as_str(), 0, 0).from_row(self.first_row);
        let floors = self.grid.get(&target.spreadsheet_id, &range).await?;
        Ok(floors
            .iter()
            .take(target.summary_units as usize)
            .position(|cells| cells.first().is_some_and(|floor| floor == unit))
            .map(|i| self.first_row + i as u32))
    }
}
