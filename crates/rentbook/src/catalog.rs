//! The list of flats a spreadsheet holds

use std::sync::Arc;

use rentbook_core::ALL_UNITS;
use rentbook_grid::GridAdapter;
use serde::Serialize;

use crate::error::Result;

/// A selectable flat
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitOption {
    pub label: String,
    pub value: String,
}

impl UnitOption {
    fn named(name: &str) -> Self {
        Self {
            label: name.to_string(),
            value: name.to_string(),
        }
    }
}

/// Lists flat sheets, skipping the reserved ones
pub struct SheetCatalog {
    grid: Arc<dyn GridAdapter>,
    reserved: Vec<String>,
}

impl SheetCatalog {
    pub fn new(grid: Arc<dyn GridAdapter>, reserved: Vec<String>) -> Self {
        Self { grid, reserved }
    }

    /// `All-Units` first, then every non-reserved sheet in the grid's order
    pub async fn list_units(&self, spreadsheet_id: &str) -> Result<Vec<UnitOption>> {
        let sheets = self.grid.list_sheets(spreadsheet_id).await?;

        let units = std::iter::once(UnitOption::named(ALL_UNITS))
            .chain(
                sheets
                    .iter()
                    .filter(|name| !self.reserved.iter().any(|r| r == *name))
                    .map(|name| UnitOption::named(name)),
            )
            .collect();
        Ok(units)
    }
}
