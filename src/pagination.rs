//! This module defines the common functionality for paging data.

/// The config for pagination.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// How many persons to display per page.
    pub persons_page_size: u64,
    /// How many accounts to display per page.
    pub accounts_page_size: u64,
    /// How many transactions to display per page.
    pub transactions_page_size: u64,
    /// The maximum number of page links to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            persons_page_size: 10,
            accounts_page_size: 5,
            transactions_page_size: 5,
            max_pages: 5,
        }
    }
}

/// A resolved page of a list view.
///
/// Clamps the requested page number into the valid range and derives the SQL
/// `LIMIT`/`OFFSET` pair for the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// The 1-based page number being displayed.
    pub current_page: u64,
    /// The number of rows per page.
    pub page_size: u64,
    /// The number of pages needed to display `row_count` rows. At least 1.
    pub page_count: u64,
}

impl Pagination {
    /// Resolve the `requested_page` query parameter against the total
    /// `row_count` of the filtered list.
    pub fn new(requested_page: Option<u64>, page_size: u64, row_count: u64) -> Self {
        let page_count = row_count.div_ceil(page_size).max(1);
        let current_page = requested_page.unwrap_or(1).clamp(1, page_count);

        Self {
            current_page,
            page_size,
            page_count,
        }
    }

    /// The SQL `OFFSET` for the current page.
    pub fn offset(&self) -> u64 {
        (self.current_page - 1) * self.page_size
    }

    /// Whether more than one page exists, i.e. the indicator strip is needed.
    pub fn has_multiple_pages(&self) -> bool {
        self.page_count > 1
    }
}

/// One element of the pagination indicator strip.
#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    /// A link to a page.
    Page(u64),
    /// The page being displayed.
    CurrPage(u64),
    /// A gap between page links.
    Ellipsis,
    /// A link to the next page.
    NextButton(u64),
    /// A link to the previous page.
    BackButton(u64),
}

/// Build the indicator strip for `pagination`, showing at most `max_pages`
/// numbered links around the current page plus first/last page links behind
/// ellipses when the range is truncated.
pub fn create_pagination_indicators(
    pagination: &Pagination,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let Pagination {
        current_page,
        page_count,
        ..
    } = *pagination;

    let half_window = max_pages / 2;
    let (window_start, window_end) = if page_count <= max_pages {
        (1, page_count)
    } else if current_page <= half_window {
        (1, max_pages)
    } else if current_page > page_count - half_window {
        (page_count - max_pages + 1, page_count)
    } else {
        (current_page - half_window, current_page + half_window)
    };

    let mut indicators = Vec::new();

    if current_page > 1 {
        indicators.push(PaginationIndicator::BackButton(current_page - 1));
    }

    if window_start > 1 {
        indicators.push(PaginationIndicator::Page(1));
        indicators.push(PaginationIndicator::Ellipsis);
    }

    for page in window_start..=window_end {
        if page == current_page {
            indicators.push(PaginationIndicator::CurrPage(page));
        } else {
            indicators.push(PaginationIndicator::Page(page));
        }
    }

    if window_end < page_count {
        indicators.push(PaginationIndicator::Ellipsis);
        indicators.push(PaginationIndicator::Page(page_count));
    }

    if current_page < page_count {
        indicators.push(PaginationIndicator::NextButton(current_page + 1));
    }

    indicators
}


#[cfg(test)]
mod indicator_tests {
    use super::{Pagination, PaginationIndicator, create_pagination_indicators};

    fn pagination(current_page: u64, page_count: u64) -> Pagination {
        Pagination {
            current_page,
            page_size: 10,
            page_count,
        }
    }

    #[test]
    fn shows_all_pages() {
        let want = [
            PaginationIndicator::CurrPage(1),
            PaginationIndicator::Page(2),
            PaginationIndicator::Page(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::Page(5),
            PaginationIndicator::NextButton(2),
        ];

        let got = create_pagination_indicators(&pagination(1, 5), 5);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn shows_page_subset_on_left() {
        let want = [
            PaginationIndicator::CurrPage(1),
            PaginationIndicator::Page(2),
            PaginationIndicator::Page(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::Page(5),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(10),
            PaginationIndicator::NextButton(2),
        ];

        let got = create_pagination_indicators(&pagination(1, 10), 5);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn shows_page_subset_in_center() {
        let want = [
            PaginationIndicator::BackButton(4),
            PaginationIndicator::Page(1),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::CurrPage(5),
            PaginationIndicator::Page(6),
            PaginationIndicator::Page(7),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(10),
            PaginationIndicator::NextButton(6),
        ];

        let got = create_pagination_indicators(&pagination(5, 10), 5);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn shows_page_subset_on_right() {
        let want = [
            PaginationIndicator::BackButton(9),
            PaginationIndicator::Page(1),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(6),
            PaginationIndicator::Page(7),
            PaginationIndicator::Page(8),
            PaginationIndicator::Page(9),
            PaginationIndicator::CurrPage(10),
        ];

        let got = create_pagination_indicators(&pagination(10, 10), 5);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn single_page_has_no_buttons() {
        let got = create_pagination_indicators(&pagination(1, 1), 5);

        assert_eq!([PaginationIndicator::CurrPage(1)], got.as_slice());
    }
}
