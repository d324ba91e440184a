//! Per-flat summary rows
//!
//! The summary sheet keeps one row per flat, columns A..G:
//! floor, rent/month, security deposit, total rent collected, total
//! electricity collected, rent start date, last entry date. Values are
//! maintained in the sheet itself; only the last entry date is written here.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::record::parse_amount;

/// Number of columns in a summary row (A..G)
pub const SUMMARY_WIDTH: usize = 7;

/// Column of the last entry date (G)
pub const LAST_ENTRY_COL: u16 = 6;

/// Aggregate metadata for one flat
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub floor: String,
    pub rent_per_month: Decimal,
    pub security_deposit: Decimal,
    pub total_rent_collected: Decimal,
    pub total_electricity_collected: Decimal,
    pub rent_start_date: String,
    pub last_entry_date: String,
}

impl SummaryRow {
    /// Map a raw row positionally; missing cells become empty strings or zero
    pub fn from_row(row: &[String]) -> Self {
        let text = |i: usize| row.get(i).cloned().unwrap_or_default();
        let amount = |i: usize| row.get(i).map_or(Decimal::ZERO, |c| parse_amount(c));
        Self {
            floor: text(0),
            rent_per_month: amount(1),
            security_deposit: amount(2),
            total_rent_collected: amount(3),
            total_electricity_collected: amount(4),
            rent_start_date: text(5),
            last_entry_date: text(6),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_row() {
        let row: Vec<String> = [
            "Flat-1", "5000", "10000", "60000", "7300.5", "01/04/2023", "03/2024",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        assert_eq!(
            SummaryRow::from_row(&row),
            SummaryRow {
                floor: "Flat-1".into(),
                rent_per_month: Decimal::new(5000, 0),
                security_deposit: Decimal::new(10000, 0),
                total_rent_collected: Decimal::new(60000, 0),
                total_electricity_collected: Decimal::new(73005, 1),
                rent_start_date: "01/04/2023".into(),
                last_entry_date: "03/2024".into(),
            }
        );
    }

    #[test]
    fn test_short_row_defaults() {
        let row = vec!["Flat-2".to_string(), "abc".to_string()];
        let summary = SummaryRow::from_row(&row);
        assert_eq!(summary.floor, "Flat-2");
        assert_eq!(summary.rent_per_month, Decimal::ZERO);
        assert_eq!(summary.total_electricity_collected, Decimal::ZERO);
        assert_eq!(summary.last_entry_date, "");
    }
}
