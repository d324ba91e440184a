//! Record blocks of a flat's sheet
//!
//! Keys are matched by exact string equality against the key column of the
//! block. Nothing on the grid side is transactional, so writes that read
//! before they write (electricity appends, updates and clears by key) hold a
//! per-sheet lock for the read and the write together. The lock only covers
//! this process.

use std::sync::{Arc, PoisonError};

use ahash::AHashMap;
use rentbook_core::{check_rows, Block, Error as CoreError, Record, SheetRange, RECORD_WIDTH};
use rentbook_grid::{GridAdapter, Rows, WriteAck};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use crate::error::{LedgerError, Result};

/// Last column read when a whole ledger row is fetched (Z)
const ROW_LAST_COL: u16 = 25;

type SheetKey = (String, String);
type LockMap = std::sync::Mutex<AHashMap<SheetKey, Arc<Mutex<()>>>>;

/// Per `(spreadsheet, sheet)` write locks
///
/// An entry lives only while some writer holds or waits on it, so sheet names
/// that never resolve leave nothing behind.
#[derive(Debug, Default)]
struct WriteLocks {
    locks: Arc<LockMap>,
}

impl WriteLocks {
    async fn acquire(&self, spreadsheet_id: &str, sheet: &str) -> SheetGuard {
        // Built before the wait so a cancelled acquire still cleans up.
        let mut held = SheetGuard {
            guard: None,
            key: (spreadsheet_id.to_string(), sheet.to_string()),
            locks: Arc::clone(&self.locks),
        };
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(held.key.clone()).or_default().clone()
        };
        held.guard = Some(lock.lock_owned().await);
        held
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Held for the duration of a write; removes the map entry on release when no
/// other writer shares it
struct SheetGuard {
    guard: Option<OwnedMutexGuard<()>>,
    key: SheetKey,
    locks: Arc<LockMap>,
}

impl Drop for SheetGuard {
    fn drop(&mut self) {
        self.guard.take();
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Clones are only taken under the map lock, so a count of 1 means the
        // map holds the last reference.
        if locks.get(&self.key).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(&self.key);
        }
    }
}

/// Reads and writes the rent and electricity blocks of flat sheets
pub struct LedgerStore {
    grid: Arc<dyn GridAdapter>,
    base_row: u32,
    locks: WriteLocks,
}

impl LedgerStore {
    /// Create a store whose ledger rows start at `base_row`
    pub fn new(grid: Arc<dyn GridAdapter>, base_row: u32) -> Self {
        Self {
            grid,
            base_row,
            locks: WriteLocks::default(),
        }
    }

    /// Row number of the first ledger row
    pub fn base_row(&self) -> u32 {
        self.base_row
    }

    /// Append records to a block
    ///
    /// Rent rows go through the grid's table append anchored at the first
    /// ledger row. Electricity rows are placed by position: the electricity
    /// key column is counted from the first ledger row and the rows are
    /// written directly below. A row written this way may already hold a rent
    /// record; the two blocks never overlap.
    pub async fn append(
        &self,
        spreadsheet_id: &str,
        sheet: &str,
        block: Block,
        rows: Rows,
    ) -> Result<WriteAck> {
        check_rows(&rows)?;
        let _guard = self.locks.acquire(spreadsheet_id, sheet).await;

        let ack = match block {
            Block::Rent => {
                let range = SheetRange::cell(sheet, block.first_col(), self.base_row);
                self.grid.append(spreadsheet_id, &range, rows).await?
            }
            Block::Electricity => {
                let keys = SheetRange::block(block, sheet)
                    .first_column()
                    .from_row(self.base_row);
                let count = self.grid.get(spreadsheet_id, &keys).await?.len() as u32;
                let first = self.base_row + count;
                let last = first + rows.len() as u32 - 1;
                debug!(sheet, existing = count, row = first, "placing electricity rows");

                let range = SheetRange::block(block, sheet).rows(first, last);
                self.grid.update(spreadsheet_id, &range, rows).await?
            }
        };

        info!(
            sheet,
            block = block.name(),
            rows = ack.updated_rows,
            "appended records"
        );
        Ok(ack)
    }

    /// Find the first record in `block` keyed `key`
    pub async fn find_by_key(
        &self,
        spreadsheet_id: &str,
        sheet: &str,
        block: Block,
        key: &str,
    ) -> Result<Record> {
        let (_, record) = self.locate(spreadsheet_id, sheet, block, key).await?;
        Ok(record)
    }

    /// Overwrite the first record in `block` keyed `key`
    ///
    /// `values` must be a single row; it is padded with empty cells to the
    /// full block width so the write always covers exactly the three block
    /// columns.
    pub async fn update_by_key(
        &self,
        spreadsheet_id: &str,
        sheet: &str,
        block: Block,
        key: &str,
        values: Rows,
    ) -> Result<WriteAck> {
        if values.len() != 1 {
            return Err(LedgerError::validation(format!(
                "an update replaces exactly one record, got {} rows",
                values.len()
            )));
        }
        check_rows(&values)?;

        let _guard = self.locks.acquire(spreadsheet_id, sheet).await;
        let (row, _) = self.locate(spreadsheet_id, sheet, block, key).await?;
        let ack = self
            .write_block(spreadsheet_id, sheet, block, row, pad(values))
            .await?;

        info!(sheet, block = block.name(), key, row, "updated record");
        Ok(ack)
    }

    /// Blank the first record in `block` keyed `key`
    ///
    /// The row itself stays; later rows are not shifted up.
    pub async fn clear_by_key(
        &self,
        spreadsheet_id: &str,
        sheet: &str,
        block: Block,
        key: &str,
    ) -> Result<WriteAck> {
        let _guard = self.locks.acquire(spreadsheet_id, sheet).await;
        let (row, _) = self.locate(spreadsheet_id, sheet, block, key).await?;
        let blank = vec![vec![String::new(); RECORD_WIDTH]];
        let ack = self
            .write_block(spreadsheet_id, sheet, block, row, blank)
            .await?;

        info!(sheet, block = block.name(), key, row, "cleared record");
        Ok(ack)
    }

    /// Every ledger row of a sheet in stored order (oldest first), columns A..Z
    pub async fn rows(&self, spreadsheet_id: &str, sheet: &str) -> Result<Rows> {
        let range = SheetRange::columns(sheet, 0, ROW_LAST_COL).from_row(self.base_row);
        Ok(self.grid.get(spreadsheet_id, &range).await?)
    }

    /// Row number and contents of the first record keyed `key`
    async fn locate(
        &self,
        spreadsheet_id: &str,
        sheet: &str,
        block: Block,
        key: &str,
    ) -> Result<(u32, Record)> {
        let range = SheetRange::block(block, sheet).from_row(self.base_row);
        let rows = self.grid.get(spreadsheet_id, &range).await?;

        rows.iter()
            .position(|cells| cells.first().is_some_and(|k| k == key))
            .map(|i| (self.base_row + i as u32, Record::from_cells(&rows[i])))
            .ok_or_else(|| CoreError::NotFound(key.to_string()).into())
    }

    async fn write_block(
        &self,
        spreadsheet_id: &str,
        sheet: &str,
        block: Block,
        row: u32,
        values: Rows,
    ) -> Result<WriteAck> {
        let range = SheetRange::block(block, sheet).rows(row, row);
        Ok(self.grid.update(spreadsheet_id, &range, values).await?)
    }
}

fn pad(mut values: Rows) -> Rows {
    for row in &mut values {
        row.resize(RECORD_WIDTH, String::new());
    }
    values
}
