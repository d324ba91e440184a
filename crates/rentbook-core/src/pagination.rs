//! Fixed-size pages over ledger entries
//!
//! Entries are stored oldest first (each append lands below the previous one)
//! but displayed newest first. [`newest_first`] flips the stored order before
//! anything is decoded or paged.

use serde::Serialize;

use crate::error::{Error, Result};

/// A validated 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    page_size: usize,
}

impl PageRequest {
    /// Page used when the caller does not ask for one
    pub const DEFAULT_PAGE: usize = 1;

    /// Page size used when the caller does not ask for one
    pub const DEFAULT_PAGE_SIZE: usize = 10;

    /// Create a page request; both values must be at least 1
    pub fn new(page: usize, page_size: usize) -> Result<Self> {
        if page < 1 || page_size < 1 {
            return Err(Error::InvalidPage(format!(
                "page {} and pageSize {} must both be >= 1",
                page, page_size
            )));
        }
        Ok(Self { page, page_size })
    }

    /// Parse query-string values, applying the defaults for missing ones
    ///
    /// # Examples
    /// ```
    /// use rentbook_core::PageRequest;
    ///
    /// let req = PageRequest::parse(None, Some("25")).unwrap();
    /// assert_eq!((req.page(), req.page_size()), (1, 25));
    /// assert!(PageRequest::parse(Some("0"), None).is_err());
    /// assert!(PageRequest::parse(Some("two"), None).is_err());
    /// ```
    pub fn parse(page: Option<&str>, page_size: Option<&str>) -> Result<Self> {
        let page = parse_count(page, Self::DEFAULT_PAGE, "page")?;
        let page_size = parse_count(page_size, Self::DEFAULT_PAGE_SIZE, "pageSize")?;
        Self::new(page, page_size)
    }

    /// 1-based page number
    pub fn page(&self) -> usize {
        self.page
    }

    /// Maximum number of rows per page
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Index of the first item on this page
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

fn parse_count(raw: Option<&str>, default: usize, name: &str) -> Result<usize> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(text) => text
            .parse::<usize>()
            .map_err(|_| Error::InvalidPage(format!("{} '{}' is not a number", name, text))),
    }
}

/// One page of results plus the totals needed to render a pager
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub page: usize,
    pub page_size: usize,
    pub total_entries: usize,
    pub total_pages: usize,
    pub rows: Vec<T>,
}

/// Cut one page out of `items`
///
/// Pages past the end come back with empty `rows`.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total_entries = items.len();
    let rows = items
        .into_iter()
        .skip(request.offset())
        .take(request.page_size())
        .collect();

    Page {
        page: request.page(),
        page_size: request.page_size(),
        total_entries,
        total_pages: total_entries.div_ceil(request.page_size()),
        rows,
    }
}

/// Flip stored (oldest first) rows into display order (newest first)
pub fn newest_first<T>(mut items: Vec<T>) -> Vec<T> {
    items.reverse();
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn req(page: usize, page_size: usize) -> PageRequest {
        PageRequest::new(page, page_size).unwrap()
    }

    #[test]
    fn test_first_middle_and_last_page() {
        let items: Vec<u32> = (1..=23).collect();

        let first = paginate(items.clone(), req(1, 10));
        assert_eq!(first.rows, (1..=10).collect::<Vec<_>>());
        assert_eq!((first.total_entries, first.total_pages), (23, 3));

        let middle = paginate(items.clone(), req(2, 10));
        assert_eq!(middle.rows, (11..=20).collect::<Vec<_>>());

        let last = paginate(items, req(3, 10));
        assert_eq!(last.rows, vec![21, 22, 23]);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let page = paginate(vec!["a", "b"], req(5, 10));
        assert_eq!(
            page,
            Page {
                page: 5,
                page_size: 10,
                total_entries: 2,
                total_pages: 1,
                rows: vec![],
            }
        );
    }

    #[test]
    fn test_empty_input() {
        let page = paginate(Vec::<u8>::new(), PageRequest::default());
        assert_eq!((page.total_entries, page.total_pages), (0, 0));
        assert!(page.rows.is_empty());
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let page = paginate(vec![1, 2, 3], req(usize::MAX, usize::MAX));
        assert!(page.rows.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_request_validation() {
        assert!(PageRequest::new(0, 10).is_err());
        assert!(PageRequest::new(1, 0).is_err());
        assert_eq!(PageRequest::parse(None, None).unwrap(), PageRequest::default());
        assert_eq!(PageRequest::parse(Some(" 3 "), Some("5")).unwrap(), req(3, 5));
        assert!(PageRequest::parse(Some("-1"), None).is_err());
        assert!(PageRequest::parse(None, Some("1.5")).is_err());
    }

    #[test]
    fn test_newest_first() {
        assert_eq!(newest_first(vec![1, 2, 3]), vec![3, 2, 1]);
        assert_eq!(newest_first(Vec::<u8>::new()), Vec::<u8>::new());
    }

    proptest! {
        #[test]
        fn prop_page_length_matches_formula(
            len in 0usize..200,
            page in 1usize..40,
            page_size in 1usize..40,
        ) {
            let items: Vec<usize> = (0..len).collect();
            let result = paginate(items, req(page, page_size));
            let expected = page_size.min(len.saturating_sub((page - 1) * page_size));
            prop_assert_eq!(result.rows.len(), expected);
            prop_assert!(result.rows.len() <= page_size);
        }

        #[test]
        fn prop_rows_are_a_contiguous_ordered_slice(
            len in 0usize..200,
            page in 1usize..40,
            page_size in 1usize..40,
        ) {
            let items: Vec<usize> = (0..len).collect();
            let result = paginate(items, req(page, page_size));
            let start = (page - 1) * page_size;
            for (i, value) in result.rows.iter().enumerate() {
                prop_assert_eq!(*value, start + i);
            }
        }

        #[test]
        fn prop_newest_first_is_an_involution(items in proptest::collection::vec(any::<u32>(), 0..64)) {
            prop_assert_eq!(newest_first(newest_first(items.clone())), items);
        }
    }
}
