//! Where things live in a rentbook spreadsheet

/// Fixed positions of the ledger, summary and report data
///
/// ```text
/// Flat-N sheet      rows 1..6   per-flat header / metadata
///                   rows 7..    ledger rows (rent A:C, electricity E:G)
/// Summary sheet     row 1       header
///                   rows 2..    one row per flat, A:G
/// FinancialReport   row 1       Month, one column per flat
///                   rows 2..    one row per month, ascending
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerLayout {
    /// Row number of the first ledger row in a flat's sheet
    pub base_row: u32,
    /// Name of the summary sheet
    pub summary_sheet: String,
    /// Row number of the first flat in the summary sheet
    pub summary_first_row: u32,
    /// Name of the financial report sheet
    pub report_sheet: String,
    /// Sheets that are never listed as flats
    pub reserved_sheets: Vec<String>,
}

impl LedgerLayout {
    /// Check whether a sheet name is reserved
    pub fn is_reserved(&self, sheet: &str) -> bool {
        self.reserved_sheets.iter().any(|s| s == sheet)
    }
}

impl Default for LedgerLayout {
    fn default() -> Self {
        let summary_sheet = "Summary".to_string();
        let report_sheet = "FinancialReport".to_string();
        Self {
            base_row: 7,
            summary_first_row: 2,
            reserved_sheets: vec![summary_sheet.clone(), report_sheet.clone()],
            summary_sheet,
            report_sheet,
        }
    }
}

/// A spreadsheet the service can be pointed at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Grid container id (spreadsheet id)
    pub spreadsheet_id: String,
    /// Number of flat rows in the summary sheet
    pub summary_units: u32,
}

impl Target {
    pub fn new<S: Into<String>>(spreadsheet_id: S, summary_units: u32) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            summary_units,
        }
    }
}
