//! Sheet-qualified A1 ranges
//!
//! The grid service addresses cells with ranges like `Flat-1!A7:C`, where the
//! sheet name selects a container partition, the letters select columns and the
//! optional numbers select rows. Row numbers here are 1-based, exactly as they
//! appear in the A1 string; columns are 0-based indices (A = 0).

use crate::error::{Error, Result};
use crate::record::Block;
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
pub fn column_to_letters(col: u16) -> String {
    let mut result = String::new();
    let mut n = col as u32 + 1; // 1-based for calculation

    while n > 0 {
        n -= 1;
        let c = ((n % 26) as u8 + b'A') as char;
        result.insert(0, c);
        n /= 26;
    }

    result
}

/// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
pub fn letters_to_column(letters: &str) -> Result<u16> {
    if letters.is_empty() {
        return Err(Error::InvalidAddress("empty column letters".into()));
    }

    let mut col: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::InvalidAddress(format!(
                "invalid column letter '{}'",
                c
            )));
        }
        col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        if col > MAX_COLS as u32 {
            return Err(Error::InvalidAddress(format!(
                "column '{}' out of bounds (max: {})",
                letters,
                column_to_letters(MAX_COLS - 1)
            )));
        }
    }

    Ok((col - 1) as u16)
}

/// A rectangular block of cells on a named sheet
///
/// Rows may be left open: `first_row: None` starts at the top of the sheet and
/// `last_row: None` runs to the last row holding data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SheetRange {
    /// Sheet (container partition) name
    pub sheet: String,
    /// First column (0-based)
    pub start_col: u16,
    /// Last column (0-based, inclusive)
    pub end_col: u16,
    /// First row number (1-based)
    pub first_row: Option<u32>,
    /// Last row number (1-based, inclusive)
    pub last_row: Option<u32>,
}

impl SheetRange {
    /// Whole columns `start_col..=end_col` of a sheet (`Flat-1!E:E`)
    pub fn columns<S: Into<String>>(sheet: S, start_col: u16, end_col: u16) -> Self {
        let (start_col, end_col) = if start_col <= end_col {
            (start_col, end_col)
        } else {
            (end_col, start_col)
        };
        Self {
            sheet: sheet.into(),
            start_col,
            end_col,
            first_row: None,
            last_row: None,
        }
    }

    /// The three columns of a record block (`Flat-1!A:C` or `Flat-1!E:G`)
    pub fn block<S: Into<String>>(block: Block, sheet: S) -> Self {
        Self::columns(sheet, block.first_col(), block.last_col())
    }

    /// A single cell (`Flat-1!A7`)
    pub fn cell<S: Into<String>>(sheet: S, col: u16, row: u32) -> Self {
        Self::columns(sheet, col, col).rows(row, row)
    }

    /// Start at `row` and run to the last row holding data (`Flat-1!A7:C`)
    pub fn from_row(mut self, row: u32) -> Self {
        self.first_row = Some(row);
        self.last_row = None;
        self
    }

    /// Restrict to rows `first..=last` (`Flat-1!E12:G12`)
    pub fn rows(mut self, first: u32, last: u32) -> Self {
        let (first, last) = if first <= last {
            (first, last)
        } else {
            (last, first)
        };
        self.first_row = Some(first);
        self.last_row = Some(last);
        self
    }

    /// Narrow to the first column only (the key column of a block)
    pub fn first_column(mut self) -> Self {
        self.end_col = self.start_col;
        self
    }

    /// Number of columns covered
    pub fn width(&self) -> usize {
        (self.end_col - self.start_col) as usize + 1
    }

    /// Number of rows covered, if both ends are fixed
    pub fn height(&self) -> Option<usize> {
        match (self.first_row, self.last_row) {
            (Some(first), Some(last)) => Some((last - first) as usize + 1),
            _ => None,
        }
    }

    /// Parse a range from `Sheet!A7:C` notation
    ///
    /// # Examples
    /// ```
    /// use rentbook_core::SheetRange;
    ///
    /// let range = SheetRange::parse("'Flat 2'!E7:G").unwrap();
    /// assert_eq!(range.sheet, "Flat 2");
    /// assert_eq!(range.start_col, 4);
    /// assert_eq!(range.end_col, 6);
    /// assert_eq!(range.first_row, Some(7));
    /// assert_eq!(range.last_row, None);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let bang = s
            .rfind('!')
            .ok_or_else(|| Error::InvalidRange(format!("no sheet name in '{}'", s)))?;
        let sheet = parse_sheet_name(&s[..bang])?;
        let cells = &s[bang + 1..];

        let (start, end) = match cells.find(':') {
            Some(colon) => (&cells[..colon], &cells[colon + 1..]),
            None => (cells, cells),
        };
        let (start_col, start_row) = parse_bound(start, s)?;
        let (end_col, end_row) = parse_bound(end, s)?;

        let (first_row, last_row) = match (start_row, end_row) {
            (None, None) => (None, None),
            (Some(first), None) => (Some(first), None),
            (None, Some(last)) => (Some(1), Some(last)),
            (Some(a), Some(b)) => (Some(a.min(b)), Some(a.max(b))),
        };

        let mut range = Self::columns(sheet, start_col, end_col);
        range.first_row = first_row;
        range.last_row = last_row;
        Ok(range)
    }

    /// Format as `Sheet!A7:C` string
    pub fn to_a1_string(&self) -> String {
        let start = column_to_letters(self.start_col);
        let end = column_to_letters(self.end_col);
        let cells = match (self.first_row, self.last_row) {
            (None, None) => format!("{start}:{end}"),
            (Some(first), None) => format!("{start}{first}:{end}"),
            (first, Some(last)) => {
                let first = first.unwrap_or(1);
                if self.start_col == self.end_col && first == last {
                    format!("{start}{first}")
                } else {
                    format!("{start}{first}:{end}{last}")
                }
            }
        };
        format!("{}!{}", quote_sheet_name(&self.sheet), cells)
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for SheetRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn quote_sheet_name(name: &str) -> String {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

fn parse_sheet_name(raw: &str) -> Result<String> {
    if raw.is_empty() {
        return Err(Error::InvalidRange("empty sheet name".into()));
    }
    if let Some(inner) = raw.strip_prefix('\'') {
        let inner = inner
            .strip_suffix('\'')
            .ok_or_else(|| Error::InvalidRange(format!("unterminated quote in '{}'", raw)))?;
        return Ok(inner.replace("''", "'"));
    }
    Ok(raw.to_string())
}

/// Parse one side of a range: column letters followed by an optional row number
fn parse_bound(part: &str, whole: &str) -> Result<(u16, Option<u32>)> {
    let digits_at = part
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(part.len());
    let (letters, digits) = part.split_at(digits_at);
    if letters.is_empty() {
        return Err(Error::InvalidRange(format!(
            "no column letters in '{}'",
            whole
        )));
    }
    let col = letters_to_column(letters)?;

    if digits.is_empty() {
        return Ok((col, None));
    }
    let row: u32 = digits
        .parse()
        .map_err(|_| Error::InvalidRange(format!("invalid row number in '{}'", whole)))?;
    if row == 0 {
        return Err(Error::InvalidRange(format!(
            "row number must be >= 1 in '{}'",
            whole
        )));
    }
    if row > MAX_ROWS {
        return Err(Error::RowOutOfBounds(row, MAX_ROWS));
    }
    Ok((col, Some(row)))
}
