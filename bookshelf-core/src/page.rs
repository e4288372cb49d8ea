//! Pagination parameters and page metadata for list results.
//!
//! [`PaginationParams`] turns raw `page`/`limit` query values into a validated window,
//! and [`Page`] carries a slice of results with the page count.

use serde::{Deserialize, Serialize};

/// Page number used when none (or an unusable one) is given.
pub const DEFAULT_PAGE: usize = 1;
/// Page size used when none (or an unusable one) is given.
pub const DEFAULT_PER_PAGE: usize = 10;

/// A single page of results.
///
/// Serializes as `{"books": [...], "totalPages": n, "currentPage": n}`; the items key is
/// named for the one collection the service exposes.
///
/// # Example
///
/// ```ignore
/// use bookshelf_core::page::{Page, PaginationParams};
///
/// let params = PaginationParams::new(2, 10);
/// let page = Page::new(items, params.total_pages(35), params.page);
/// assert_eq!(page.total_pages, 4);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items on this page.
    #[serde(rename = "books")]
    pub items: Vec<T>,
    pub total_pages: u64,
    pub current_page: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_pages: u64, current_page: usize) -> Self {
        Self { items, total_pages, current_page }
    }
}

/// Parameters for paginating through results.
///
/// Pages are 1-indexed (page 1 is the first page).
///
/// # Example
///
/// ```ignore
/// use bookshelf_core::page::PaginationParams;
///
/// let params = PaginationParams::new(2, 50);
/// assert_eq!(params.offset(), 50);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    /// The page number (1-indexed).
    pub page: usize,
    /// Number of items per page.
    pub per_page: usize,
}

impl PaginationParams {
    /// Creates new pagination parameters.
    ///
    /// # Arguments
    ///
    /// * `page` - The page number (1-indexed)
    /// * `per_page` - Number of items per page
    pub fn new(page: usize, per_page: usize) -> Self {
        Self { page, per_page }
    }

    /// Builds parameters from raw query-string values.
    ///
    /// Each value that is missing, non-numeric, zero or negative falls back to its
    /// default independently. There is no upper bound.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let params = PaginationParams::from_raw(Some("abc"), Some("25"));
    /// assert_eq!(params, PaginationParams::new(1, 25));
    /// ```
    pub fn from_raw(page: Option<&str>, per_page: Option<&str>) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(DEFAULT_PAGE),
            per_page: parse_positive(per_page).unwrap_or(DEFAULT_PER_PAGE),
        }
    }

    /// Calculates the number of items to skip for this page.
    pub fn offset(&self) -> usize {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.per_page)
    }

    /// Number of pages needed to show `count` items, rounding up.
    pub fn total_pages(&self, count: u64) -> u64 {
        match self.per_page {
            0 => 0,
            per_page => count.div_ceil(per_page as u64),
        }
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self { page: DEFAULT_PAGE, per_page: DEFAULT_PER_PAGE }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(None, None, 1, 10)]
    #[case(Some("3"), Some("5"), 3, 5)]
    #[case(Some("0"), Some("0"), 1, 10)]
    #[case(Some("-2"), Some("-1"), 1, 10)]
    #[case(Some("abc"), Some("25"), 1, 25)]
    #[case(Some("2"), Some("1.5"), 2, 10)]
    #[case(Some(""), Some(" 7 "), 1, 7)]
    #[case(Some("1000"), Some("500"), 1000, 500)]
    fn test_from_raw_falls_back_per_value(
        #[case] page: Option<&str>,
        #[case] per_page: Option<&str>,
        #[case] expected_page: usize,
        #[case] expected_per_page: usize,
    ) {
        assert_eq!(
            PaginationParams::from_raw(page, per_page),
            PaginationParams::new(expected_page, expected_per_page)
        );
    }

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(3, 20, 40)]
    fn test_offset(#[case] page: usize, #[case] per_page: usize, #[case] expected: usize) {
        assert_eq!(PaginationParams::new(page, per_page).offset(), expected);
    }

    #[rstest]
    #[case(0, 10, 0)]
    #[case(1, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    #[case(35, 10, 4)]
    #[case(7, 3, 3)]
    fn test_total_pages_rounds_up(#[case] count: u64, #[case] per_page: usize, #[case] expected: u64) {
        assert_eq!(PaginationParams::new(1, per_page).total_pages(count), expected);
    }

    #[test]
    fn test_default_is_first_page_of_ten() {
        assert_eq!(PaginationParams::default(), PaginationParams::new(1, 10));
    }

    #[test]
    fn test_page_serializes_with_catalog_field_names() {
        let page = Page::new(vec![json!({ "title": "Dune" })], 3, 2);

        assert_eq!(
            serde_json::to_value(&page).unwrap(),
            json!({ "books": [{ "title": "Dune" }], "totalPages": 3, "currentPage": 2 })
        );
    }
}
