//! Page window arithmetic.

use std::ops::Range;

use super::descriptor::ADMIN_PAGE_SIZE;

/// Resolved pagination for one evaluation.
///
/// `page` is already clamped into `1..=total_pages`, and `total_pages` is at
/// least 1 even when nothing matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PageWindow {
    pub(crate) page: usize,
    pub(crate) page_size: usize,
    pub(crate) total_pages: usize,
    pub(crate) range: Range<usize>,
}

/// Compute the page window for `total_matched` items.
///
/// A zero page size falls back to [`ADMIN_PAGE_SIZE`]; a page past the end
/// clamps to the last page so a shrinking collection never yields an empty
/// page.
pub(crate) fn compute_page_window(
    total_matched: usize,
    requested_page: usize,
    requested_size: usize,
) -> PageWindow {
    let page_size = if requested_size == 0 {
        ADMIN_PAGE_SIZE
    } else {
        requested_size
    };
    let total_pages = total_matched.div_ceil(page_size).max(1);
    let page = requested_page.clamp(1, total_pages);
    let start = (page - 1).saturating_mul(page_size).min(total_matched);
    let end = start.saturating_add(page_size).min(total_matched);

    PageWindow {
        page,
        page_size,
        total_pages,
        range: start..end,
    }
}
