//! Page arithmetic shared by the demo fallback and the CLI
//!
//! Pages are 1-based. A page past the end is not an error: it yields an
//! empty slice, the same way the remote API answers.

use crate::types::PaginatedResponse;

/// Number of pages needed to show `total` items, `page_size` at a time
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Calculate slice bounds for a given page
///
/// Returns (start_index, end_index), both clamped to `total_items`.
/// Page 0 is treated as page 1.
pub fn page_bounds(total_items: usize, page: usize, page_size: usize) -> (usize, usize) {
    let page = page.max(1);
    let start = (page - 1).saturating_mul(page_size).min(total_items);
    let end = start.saturating_add(page_size).min(total_items);
    (start, end)
}

/// Slice an ordered collection into a single page
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> PaginatedResponse<T> {
    let (start, end) = page_bounds(items.len(), page, page_size);

    PaginatedResponse {
        items: items[start..end].to_vec(),
        total: items.len(),
        page,
        page_size,
        total_pages: total_pages(items.len(), page_size),
    }
}

/// Navigation hints for a page, in the form the CLI prints them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNavigation {
    pub next_page: Option<usize>,
    pub prev_page: Option<usize>,
}

pub fn navigation(page: usize, total_pages: usize) -> PageNavigation {
    PageNavigation {
        next_page: (page < total_pages).then_some(page + 1),
        prev_page: (page > 1).then(|| (page - 1).min(total_pages.max(1))),
    }
}
