//! The [`Rentbook`] facade: one entry point per ledger operation

use std::sync::Arc;

use rentbook_core::{
    newest_first, paginate, Block, Error as CoreError, LedgerEntry, Page, PageRequest, Record,
    SummaryRow, ALL_UNITS,
};
use rentbook_grid::{GridAdapter, Rows, WriteAck};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::{SheetCatalog, UnitOption};
use crate::error::{LedgerError, Result};
use crate::layout::{LedgerLayout, Target};
use crate::report::FinancialReport;
use crate::store::LedgerStore;
use crate::summary::SummaryProjection;

/// A page of ledger entries, newest first, with the flat's summary row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEntries {
    #[serde(flatten)]
    pub page: Page<LedgerEntry>,
    pub sheet_summary: Option<SummaryRow>,
}

/// Rent and electricity ledgers over one injected grid
///
/// Holds the production spreadsheet and, optionally, a demo spreadsheet with a
/// smaller summary. Every operation takes the [`Target`] it runs against; pick
/// one with [`Rentbook::target`].
///
/// ```
/// use std::sync::Arc;
/// use rentbook::prelude::*;
/// use rentbook_grid::MemoryGrid;
///
/// # block_on(async {
/// let grid = MemoryGrid::new()
///     .with_sheet("prod", "Summary", vec![])
///     .with_sheet("prod", "Flat-1", vec![]);
/// let book = Rentbook::new(Arc::new(grid), LedgerLayout::default(), Target::new("prod", 5));
///
/// let target = book.target(false).unwrap();
/// let rows = vec![vec!["01/2024".to_string(), "5000".into(), "paid".into()]];
/// book.add_entry(target, "Flat-1", Block::Rent, rows).await.unwrap();
///
/// let record = book.amount(target, "Flat-1", Block::Rent, "01/2024").await.unwrap();
/// assert_eq!(record.note, "paid");
/// # });
/// # fn block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub struct Rentbook {
    layout: LedgerLayout,
    production: Target,
    demo: Option<Target>,
    store: LedgerStore,
    catalog: SheetCatalog,
    summary: SummaryProjection,
    report: FinancialReport,
}

impl Rentbook {
    /// Build the services over `grid`
    pub fn new(grid: Arc<dyn GridAdapter>, layout: LedgerLayout, production: Target) -> Self {
        Self {
            store: LedgerStore::new(grid.clone(), layout.base_row),
            catalog: SheetCatalog::new(grid.clone(), layout.reserved_sheets.clone()),
            summary: SummaryProjection::new(
                grid.clone(),
                layout.summary_sheet.as_str(),
                layout.summary_first_row,
            ),
            report: FinancialReport::new(grid, layout.report_sheet.as_str()),
            layout,
            production,
            demo: None,
        }
    }

    /// Add the demo spreadsheet
    pub fn with_demo(mut self, demo: Target) -> Self {
        self.demo = Some(demo);
        self
    }

    pub fn layout(&self) -> &LedgerLayout {
        &self.layout
    }

    /// Select the demo or the production spreadsheet
    pub fn target(&self, demo: bool) -> Result<&Target> {
        if !demo {
            return Ok(&self.production);
        }
        self.demo
            .as_ref()
            .ok_or_else(|| LedgerError::validation("Demo spreadsheet is not configured."))
    }

    /// Summary rows of every flat
    pub async fn all_flats(&self, target: &Target) -> Result<Vec<SummaryRow>> {
        self.summary.read(target).await
    }

    /// Flats to pick from, `All-Units` first
    pub async fn units(&self, target: &Target) -> Result<Vec<UnitOption>> {
        self.catalog.list_units(&target.spreadsheet_id).await
    }

    /// Total collected for `tenant` between two months, inclusive
    pub async fn financial_total(
        &self,
        target: &Target,
        from: &str,
        to: &str,
        tenant: &str,
    ) -> Result<Decimal> {
        self.report
            .total(&target.spreadsheet_id, from, to, tenant)
            .await
    }

    /// Append records, then note the last key in the flat's summary row
    pub async fn add_entry(
        &self,
        target: &Target,
        sheet: &str,
        block: Block,
        rows: Rows,
    ) -> Result<WriteAck> {
        let sheet = self.ledger_sheet(sheet)?;
        let last_key = rows.last().and_then(|row| row.first()).cloned();

        let ack = self
            .store
            .append(&target.spreadsheet_id, sheet, block, rows)
            .await?;

        if let Some(key) = last_key {
            match self.summary.touch_last_entry(target, sheet, &key).await {
                Ok(Some(_)) => debug!(sheet, key = %key, "last entry date updated"),
                Ok(None) => debug!(sheet, "no summary row to update"),
                Err(e) => warn!(sheet, error = %e, "failed to update last entry date"),
            }
        }
        Ok(ack)
    }

    /// One page of a flat's entries, newest first
    pub async fn recent_entries(
        &self,
        target: &Target,
        sheet: &str,
        request: PageRequest,
    ) -> Result<RecentEntries> {
        let sheet = self.ledger_sheet(sheet)?;
        let rows = self.store.rows(&target.spreadsheet_id, sheet).await?;
        let entries = LedgerEntry::decode_all(&newest_first(rows));
        let sheet_summary = self.summary.summary_for(target, sheet).await?;

        Ok(RecentEntries {
            page: paginate(entries, request),
            sheet_summary,
        })
    }

    /// The record keyed `key`
    pub async fn amount(
        &self,
        target: &Target,
        sheet: &str,
        block: Block,
        key: &str,
    ) -> Result<Record> {
        let sheet = self.ledger_sheet(sheet)?;
        self.store
            .find_by_key(&target.spreadsheet_id, sheet, block, key)
            .await
    }

    /// Replace the record keyed `key`
    pub async fn update_amount(
        &self,
        target: &Target,
        sheet: &str,
        block: Block,
        key: &str,
        values: Rows,
    ) -> Result<WriteAck> {
        let sheet = self.ledger_sheet(sheet)?;
        self.store
            .update_by_key(&target.spreadsheet_id, sheet, block, key, values)
            .await
    }

    /// Blank the record keyed `key`
    pub async fn clear_amount(
        &self,
        target: &Target,
        sheet: &str,
        block: Block,
        key: &str,
    ) -> Result<WriteAck> {
        let sheet = self.ledger_sheet(sheet)?;
        self.store
            .clear_by_key(&target.spreadsheet_id, sheet, block, key)
            .await
    }

    /// Overwrite a flat's summary values (columns B onwards)
    pub async fn update_summary(
        &self,
        target: &Target,
        unit: &str,
        values: Vec<String>,
    ) -> Result<WriteAck> {
        self.summary
            .update(target, unit, values)
            .await?
            .ok_or_else(|| CoreError::NotFound(unit.to_string()).into())
    }

    /// Reject names that have no ledger behind them
    fn ledger_sheet<'a>(&self, sheet: &'a str) -> Result<&'a str> {
        if sheet.trim().is_empty() {
            return Err(LedgerError::validation("Sheet name is required."));
        }
        if sheet == ALL_UNITS || self.layout.is_reserved(sheet) {
            return Err(LedgerError::validation(format!(
                "'{}' is not a flat sheet.",
                sheet
            )));
        }
        Ok(sheet)
    }
}
