//! Totals over an inclusive month-year window
//!
//! The window is found by position, not by comparing dates: rows are scanned
//! in stored (ascending) order, the window opens at the first row keyed
//! `from` and closes right after the first later row keyed `to`. If `to`
//! never shows up after `from`, every row from `from` to the end is counted.

use rust_decimal::Decimal;

use crate::record::parse_amount;
use crate::ALL_UNITS;

/// Which cells of a row contribute to a total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountColumn {
    /// A single column by 0-based index (the key column is 0)
    Index(usize),
    /// Every column except the key column, for reports without a derived
    /// total column
    All,
}

impl AmountColumn {
    /// Resolve a tenant name against a report header row
    ///
    /// Any name selects the first non-key header cell equal to it. A report
    /// without an [`ALL_UNITS`] column still answers for it by summing every
    /// flat column.
    pub fn for_tenant<S: AsRef<str>>(header: &[S], tenant: &str) -> Option<Self> {
        let column = header
            .iter()
            .skip(1)
            .position(|name| name.as_ref().trim() == tenant)
            .map(|i| AmountColumn::Index(i + 1));
        match column {
            None if tenant == ALL_UNITS => Some(AmountColumn::All),
            column => column,
        }
    }

    fn sum(self, row: &[String]) -> Decimal {
        match self {
            AmountColumn::Index(i) => row.get(i).map_or(Decimal::ZERO, |c| parse_amount(c)),
            AmountColumn::All => row.iter().skip(1).map(|c| parse_amount(c)).sum(),
        }
    }
}

/// Sum `column` over the rows between the `from` and `to` keys, inclusive
///
/// Non-numeric cells count as zero. A `from` key that never occurs gives zero.
///
/// # Examples
/// ```
/// use rentbook_core::{total_in_range, AmountColumn};
/// use rust_decimal::Decimal;
///
/// let rows: Vec<Vec<String>> = [("Jan", "10"), ("Feb", "5"), ("Mar", "7")]
///     .iter()
///     .map(|(k, v)| vec![k.to_string(), v.to_string()])
///     .collect();
/// let total = total_in_range(&rows, "Jan", "Mar", AmountColumn::Index(1));
/// assert_eq!(total, Decimal::new(22, 0));
/// ```
pub fn total_in_range<R: AsRef<[String]>>(
    rows: &[R],
    from: &str,
    to: &str,
    column: AmountColumn,
) -> Decimal {
    let mut total = Decimal::ZERO;
    let mut within = false;

    for row in rows {
        let row = row.as_ref();
        let key = row.first().map(String::as_str).unwrap_or("");

        if !within && key == from {
            within = true;
        }
        if within {
            total += column.sum(row);
            if key == to {
                break;
            }
        }
    }

    total
}
