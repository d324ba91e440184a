//! In-process grid.
//!
//! Mirrors the parts of the Sheets values API the ledger relies on: trimmed
//! reads, positional updates, and appends that land below the last row holding
//! data in the appended columns.

use ahash::AHashMap;
use async_trait::async_trait;
use rentbook_core::SheetRange;
use tokio::sync::RwLock;

use crate::adapter::{GridAdapter, Rows, WriteAck};
use crate::error::{GridError, Result};

/// One sheet: a dense block of cells, row-major, 0-based.
#[derive(Debug, Clone, Default)]
struct Sheet {
    name: String,
    cells: Vec<Vec<String>>,
}

impl Sheet {
    fn cell(&self, row: usize, col: usize) -> &str {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    fn set(&mut self, row: usize, col: usize, value: String) {
        if self.cells.len() <= row {
            self.cells.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.cells[row];
        if cells.len() <= col {
            cells.resize(col + 1, String::new());
        }
        cells[col] = value;
    }

    /// Index of the last row with a non-empty cell in `cols`, if any.
    fn last_filled_row(&self, cols: std::ops::RangeInclusive<usize>) -> Option<usize> {
        (0..self.cells.len())
            .rev()
            .find(|&row| cols.clone().any(|col| !self.cell(row, col).is_empty()))
    }

    fn write(&mut self, top: usize, left: usize, rows: &Rows) {
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                self.set(top + r, left + c, value.clone());
            }
        }
    }
}

#[derive(Debug, Default)]
struct Book {
    sheets: Vec<Sheet>,
}

impl Book {
    fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }
}

/// A grid held entirely in memory, keyed by spreadsheet id.
#[derive(Debug, Default)]
pub struct MemoryGrid {
    books: RwLock<AHashMap<String, Book>>,
}

impl MemoryGrid {
    /// Create an empty grid with no spreadsheets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet with initial contents (row 1 first). Builder style, for setup.
    pub fn with_sheet<S: Into<String>>(mut self, spreadsheet_id: &str, sheet: S, rows: Rows) -> Self {
        let book = self
            .books
            .get_mut()
            .entry(spreadsheet_id.to_string())
            .or_default();
        book.sheets.push(Sheet {
            name: sheet.into(),
            cells: rows,
        });
        self
    }

    /// Add an empty sheet, creating the spreadsheet if needed. Existing sheets are left alone.
    pub async fn add_sheet(&self, spreadsheet_id: &str, sheet: &str) {
        let mut books = self.books.write().await;
        let book = books.entry(spreadsheet_id.to_string()).or_default();
        if book.sheet(sheet).is_none() {
            book.sheets.push(Sheet {
                name: sheet.to_string(),
                cells: Vec::new(),
            });
        }
    }

    /// Snapshot of a sheet's cells from row 1, untrimmed.
    pub async fn sheet_rows(&self, spreadsheet_id: &str, sheet: &str) -> Option<Rows> {
        let books = self.books.read().await;
        books
            .get(spreadsheet_id)
            .and_then(|book| book.sheet(sheet))
            .map(|s| s.cells.clone())
    }
}

fn lookup<'a>(
    books: &'a AHashMap<String, Book>,
    spreadsheet_id: &str,
    range: &SheetRange,
) -> Result<&'a Sheet> {
    books
        .get(spreadsheet_id)
        .ok_or_else(|| GridError::SpreadsheetNotFound(spreadsheet_id.to_string()))?
        .sheet(&range.sheet)
        .ok_or_else(|| GridError::SheetNotFound(range.to_string()))
}

fn lookup_mut<'a>(
    books: &'a mut AHashMap<String, Book>,
    spreadsheet_id: &str,
    range: &SheetRange,
) -> Result<&'a mut Sheet> {
    books
        .get_mut(spreadsheet_id)
        .ok_or_else(|| GridError::SpreadsheetNotFound(spreadsheet_id.to_string()))?
        .sheet_mut(&range.sheet)
        .ok_or_else(|| GridError::SheetNotFound(range.to_string()))
}

fn ack(rows: &Rows) -> WriteAck {
    WriteAck {
        updated_rows: rows.len() as u32,
        updated_cells: rows.iter().map(|r| r.len() as u32).sum(),
    }
}

#[async_trait]
impl GridAdapter for MemoryGrid {
    async fn get(&self, spreadsheet_id: &str, range: &SheetRange) -> Result<Rows> {
        let books = self.books.read().await;
        let sheet = lookup(&books, spreadsheet_id, range)?;

        let cols = range.start_col as usize..=range.end_col as usize;
        let top = range.first_row.unwrap_or(1) as usize - 1;
        let bottom = match range.last_row {
            Some(last) => last as usize - 1,
            None => match sheet.last_filled_row(cols.clone()) {
                Some(row) => row,
                None => return Ok(Vec::new()),
            },
        };

        let mut rows: Rows = (top..=bottom)
            .map(|row| {
                let mut cells: Vec<String> =
                    cols.clone().map(|col| sheet.cell(row, col).to_string()).collect();
                while cells.last().is_some_and(|c| c.is_empty()) {
                    cells.pop();
                }
                cells
            })
            .collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        Ok(rows)
    }

    async fn append(
        &self,
        spreadsheet_id: &str,
        range: &SheetRange,
        rows: Rows,
    ) -> Result<WriteAck> {
        let mut books = self.books.write().await;
        let sheet = lookup_mut(&mut books, spreadsheet_id, range)?;

        let data_width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let left = range.start_col as usize;
        let right = left + range.width().max(data_width).max(1) - 1;
        let top = range.first_row.unwrap_or(1) as usize - 1;

        let target = match sheet.last_filled_row(left..=right) {
            Some(last) if last >= top => last + 1,
            _ => top,
        };
        sheet.write(target, left, &rows);

        tracing::debug!(sheet = %range.sheet, row = target + 1, count = rows.len(), "memory append");
        Ok(ack(&rows))
    }

    async fn update(
        &self,
        spreadsheet_id: &str,
        range: &SheetRange,
        rows: Rows,
    ) -> Result<WriteAck> {
        let mut books = self.books.write().await;
        let sheet = lookup_mut(&mut books, spreadsheet_id, range)?;

        let data_width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let too_tall = range.height().is_some_and(|h| rows.len() > h);
        let too_wide = range.first_row.is_some() && data_width > range.width();
        if too_tall || too_wide {
            return Err(GridError::RangeTooSmall {
                range: range.to_string(),
                rows: rows.len(),
                cols: data_width,
            });
        }

        let top = range.first_row.unwrap_or(1) as usize - 1;
        sheet.write(top, range.start_col as usize, &rows);
        Ok(ack(&rows))
    }

    async fn list_sheets(&self, spreadsheet_id: &str) -> Result<Vec<String>> {
        let books = self.books.read().await;
        let book = books
            .get(spreadsheet_id)
            .ok_or_else(|| GridError::SpreadsheetNotFound(spreadsheet_id.to_string()))?;
        Ok(book.sheets.iter().map(|s| s.name.clone()).collect())
    }
}
