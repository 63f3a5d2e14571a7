//! Page-number pagination for browse views.
//!
//! Converts 1-based `?page=` query parameters into record ranges and builds
//! the compressed page-number sequence the pagination controls render
//! (first and last page always shown, a window of +/-1 around the current
//! page, gaps collapsed to a single ellipsis per side).

// ============================================================================
// Page parameters
// ============================================================================

/// Validated page parameters (1-based page number plus page size).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u32,
    pub size: u32,
}

impl PageParams {
    /// Build parameters from raw query-string values.
    ///
    /// Values that fail to parse as positive integers fall back to page 1
    /// and the caller's default size.
    pub fn from_query(page: Option<&str>, size: Option<&str>, default_size: u32) -> Self {
        let page = page
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        let size = size
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|s| *s >= 1)
            .unwrap_or(default_size);
        PageParams { page, size }
    }

    /// SQL OFFSET for this page.
    ///
    /// Saturating: absurdly large but parseable query values yield a
    /// far-past-the-end (empty) page rather than wrapping negative.
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1).saturating_mul(self.size as i64)
    }

    /// SQL LIMIT for this page.
    pub fn limit(&self) -> i64 {
        self.size as i64
    }

    /// Inclusive record range covered by this page.
    pub fn range(&self) -> (i64, i64) {
        let start = self.offset();
        (start, start.saturating_add(self.size as i64 - 1))
    }
}

/// Number of pages needed for `total_count` records.
pub fn total_pages(total_count: i64, size: u32) -> u32 {
    if total_count <= 0 {
        return 0;
    }
    ((total_count + size as i64 - 1) / size as i64) as u32
}

// ============================================================================
// Page-number compression
// ============================================================================

/// One entry in the rendered page-number controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// Compress the full page list for display.
///
/// Page 1 and the last page are always present; pages within one of the
/// current page are shown individually; every other gap collapses to one
/// ellipsis marker.
pub fn page_items(current: u32, total_pages: u32) -> Vec<PageItem> {
    let mut items = Vec::new();
    let mut last_shown = 0u32;
    for page in 1..=total_pages {
        let in_window = page + 1 >= current && page <= current.saturating_add(1);
        if page == 1 || page == total_pages || in_window {
            if last_shown != 0 && page - last_shown > 1 {
                items.push(PageItem::Ellipsis);
            }
            items.push(PageItem::Page(page));
            last_shown = page;
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageItem::{Ellipsis, Page};

    #[test]
    fn test_from_query_defaults() {
        let params = PageParams::from_query(None, None, 9);
        assert_eq!(params, PageParams { page: 1, size: 9 });
    }

    #[test]
    fn test_from_query_rejects_garbage() {
        let params = PageParams::from_query(Some("abc"), Some("-3"), 12);
        assert_eq!(params, PageParams { page: 1, size: 12 });

        let params = PageParams::from_query(Some("0"), Some("0"), 12);
        assert_eq!(params, PageParams { page: 1, size: 12 });
    }

    #[test]
    fn test_record_range() {
        let params = PageParams { page: 1, size: 12 };
        assert_eq!(params.range(), (0, 11));

        let params = PageParams { page: 3, size: 9 };
        assert_eq!(params.range(), (18, 26));
        assert_eq!(params.offset(), 18);
        assert_eq!(params.limit(), 9);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(25, 12), 3);
        assert_eq!(total_pages(24, 12), 2);
        assert_eq!(total_pages(1, 12), 1);
        assert_eq!(total_pages(0, 12), 0);
    }

    #[test]
    fn test_page_past_the_end_is_valid() {
        // totalCount=25, pageSize=12 -> 3 pages; page 4 is an empty range,
        // not an error
        let params = PageParams::from_query(Some("4"), None, 12);
        assert_eq!(params.range(), (36, 47));
        assert_eq!(total_pages(25, 12), 3);
    }

    #[test]
    fn test_huge_query_values_do_not_overflow() {
        let params = PageParams::from_query(Some("4294967295"), Some("4294967295"), 9);
        assert!(params.offset() > 0);
        let (start, end) = params.range();
        assert!(start > 0 && end >= start);
    }

    #[test]
    fn test_page_items_compresses_both_sides() {
        assert_eq!(
            page_items(5, 20),
            vec![
                Page(1),
                Ellipsis,
                Page(4),
                Page(5),
                Page(6),
                Ellipsis,
                Page(20)
            ]
        );
    }

    #[test]
    fn test_page_items_no_ellipsis_when_window_touches_edges() {
        assert_eq!(
            page_items(2, 4),
            vec![Page(1), Page(2), Page(3), Page(4)]
        );
    }

    #[test]
    fn test_page_items_current_at_start() {
        assert_eq!(
            page_items(1, 10),
            vec![Page(1), Page(2), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn test_page_items_current_at_end() {
        assert_eq!(
            page_items(10, 10),
            vec![Page(1), Ellipsis, Page(9), Page(10)]
        );
    }

    #[test]
    fn test_page_items_single_page() {
        assert_eq!(page_items(1, 1), vec![Page(1)]);
        assert!(page_items(1, 0).is_empty());
    }
}
