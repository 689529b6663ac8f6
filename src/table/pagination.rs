//! Pagination
//!
//! Pages are 1-based. The window `[(page-1)*size, page*size)` always applies
//! to the filtered and sorted collection.

use std::fmt;
use std::ops::RangeInclusive;

/// Selectable page sizes
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 25, 50];

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Maximum number of page buttons shown at once
pub const PAGE_WINDOW: usize = 5;

/// `ceil(len / page_size)`; zero rows means zero pages.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Rows of `page` plus the total page count.
///
/// Out-of-range pages yield an empty slice.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> (&[T], usize) {
    let pages = total_pages(items.len(), page_size);
    if page == 0 || page > pages {
        return (&[], pages);
    }
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(items.len());
    (&items[start..end], pages)
}

/// Page numbers to render as buttons.
///
/// All pages when there are at most [`PAGE_WINDOW`], otherwise a window
/// centred on `current` and clamped to `1..=total`.
pub fn page_window(current: usize, total: usize) -> RangeInclusive<usize> {
    if total == 0 {
        return 1..=0;
    }
    if total <= PAGE_WINDOW {
        return 1..=total;
    }
    let half = PAGE_WINDOW / 2;
    let current = current.clamp(1, total);
    let start = current.saturating_sub(half).max(1).min(total + 1 - PAGE_WINDOW);
    start..=start + PAGE_WINDOW - 1
}

/// "Mostrando {start}-{end} de {total} registros"
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageSummary {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

impl PageSummary {
    pub fn new(page: usize, page_size: usize, total: usize) -> Self {
        let page = page.max(1);
        Self {
            start: ((page - 1) * page_size + 1).min(total),
            end: (page * page_size).min(total),
            total,
        }
    }
}

impl fmt::Display for PageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mostrando {}-{} de {} registros",
            self.start, self.end, self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twelve_rows_two_pages() {
        let items: Vec<usize> = (1..=12).collect();
        let (first, pages) = paginate(&items, 1, 10);
        assert_eq!(pages, 2);
        assert_eq!(first.len(), 10);
        let (second, _) = paginate(&items, 2, 10);
        assert_eq!(second, &[11, 12]);
        assert_eq!(
            PageSummary::new(2, 10, 12).to_string(),
            "Mostrando 11-12 de 12 registros"
        );
    }

    #[test]
    fn test_pages_concatenate_to_the_whole() {
        let items: Vec<usize> = (0..37).collect();
        for size in PAGE_SIZE_OPTIONS {
            let pages = total_pages(items.len(), size);
            let joined: Vec<usize> = (1..=pages)
                .flat_map(|p| paginate(&items, p, size).0.to_vec())
                .collect();
            assert_eq!(joined, items);
        }
    }

    #[test]
    fn test_empty_collection() {
        let items: Vec<u8> = Vec::new();
        let (rows, pages) = paginate(&items, 1, 10);
        assert!(rows.is_empty());
        assert_eq!(pages, 0);
        assert_eq!(PageSummary::new(1, 10, 0).to_string(), "Mostrando 0-0 de 0 registros");
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let items = [1, 2, 3];
        assert!(paginate(&items, 0, 2).0.is_empty());
        assert!(paginate(&items, 3, 2).0.is_empty());
    }

    #[test]
    fn test_page_window() {
        assert_eq!(page_window(1, 3), 1..=3);
        assert_eq!(page_window(2, 10), 1..=5);
        assert_eq!(page_window(3, 10), 1..=5);
        assert_eq!(page_window(6, 10), 4..=8);
        assert_eq!(page_window(9, 10), 6..=10);
        assert_eq!(page_window(10, 10), 6..=10);
    }
}
