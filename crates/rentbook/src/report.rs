//! Month-range totals from the financial report sheet

use std::sync::Arc;

use rentbook_core::{total_in_range, AmountColumn, SheetRange};
use rentbook_grid::GridAdapter;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{LedgerError, Result};

/// Last column read from the report (AZ)
const REPORT_LAST_COL: u16 = 51;

/// The financial report: a `Month` column and one amount column per flat
pub struct FinancialReport {
    grid: Arc<dyn GridAdapter>,
    sheet: String,
}

impl FinancialReport {
    pub fn new<S: Into<String>>(grid: Arc<dyn GridAdapter>, sheet: S) -> Self {
        Self {
            grid,
            sheet: sheet.into(),
        }
    }

    /// Total collected for `tenant` between the `from` and `to` months
    ///
    /// `All-Units` reads the report's own `All-Units` column when it has one
    /// and otherwise sums every flat column. A tenant with no column in the
    /// report header is rejected.
    pub async fn total(
        &self,
        spreadsheet_id: &str,
        from: &str,
        to: &str,
        tenant: &str,
    ) -> Result<Decimal> {
        let range = SheetRange::columns(self.sheet.as_str(), 0, REPORT_LAST_COL);
        let rows = self.grid.get(spreadsheet_id, &range).await?;
        let (header, data) = match rows.split_first() {
            Some((header, data)) => (header.as_slice(), data),
            None => (&[][..], &[][..]),
        };

        let column = AmountColumn::for_tenant(header, tenant)
            .ok_or_else(|| LedgerError::validation(format!("Unknown tenant '{}'.", tenant)))?;
        let total = total_in_range(data, from, to, column);

        debug!(from, to, tenant, %total, "financial total");
        Ok(total)
    }
}
