//! Server-page envelope and page-control generation.

use serde::Serialize;

/// Default number of records per list page.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Page-control sequence for a list. `Some(n)` is a page link, `None` is an
/// ellipsis marker. Empty when there is a single page: no controls render.
///
/// Page 1 is always shown; an ellipsis follows when the current page is past
/// 3; the window `[max(2, current-1), min(last-1, current+1)]` is shown
/// without duplicates; a second ellipsis appears when the current page is
/// before `last - 2`; the last page closes the sequence whenever it exceeds 1.
fn page_links(current_page: usize, last_page: usize) -> Vec<Option<usize>> {
    if last_page <= 1 {
        return vec![];
    }

    let current_page = current_page.clamp(1, last_page);
    let mut pages = vec![Some(1)];

    if current_page > 3 {
        pages.push(None);
    }

    let window_start = current_page.saturating_sub(1).max(2);
    let window_end = (current_page + 1).min(last_page - 1);
    pages.extend((window_start..=window_end).map(Some));

    if current_page + 2 < last_page {
        pages.push(None);
    }

    pages.push(Some(last_page));
    pages
}

/// A server-returned page of records plus the metadata the list view needs.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: usize,
    pub last_page: usize,
    pub per_page: usize,
    /// 1-based index of the first record on this page, 0 when empty.
    pub from: usize,
    /// 1-based index of the last record on this page, 0 when empty.
    pub to: usize,
    pub total: usize,
    /// Rendered page controls; empty means no pagination UI.
    pub pages: Vec<Option<usize>>,
}

impl<T> Page<T> {
    /// Wraps one page of records. `current_page` is clamped into
    /// `[1, last_page]`; `total` is the unpaginated record count.
    pub fn new(data: Vec<T>, total: usize, current_page: usize, per_page: usize) -> Self {
        let last_page = total.div_ceil(per_page).max(1);
        let current_page = current_page.clamp(1, last_page);
        let (from, to) = if data.is_empty() {
            (0, 0)
        } else {
            let from = (current_page - 1) * per_page + 1;
            (from, from + data.len() - 1)
        };
        let pages = page_links(current_page, last_page);
        Self {
            data,
            current_page,
            last_page,
            per_page,
            from,
            to,
            total,
            pages,
        }
    }

    /// Whether any pagination controls should render.
    pub fn has_pages(&self) -> bool {
        !self.pages.is_empty()
    }

    pub fn prev_page(&self) -> Option<usize> {
        (self.current_page > 1).then(|| self.current_page - 1)
    }

    pub fn next_page(&self) -> Option<usize> {
        (self.current_page < self.last_page).then(|| self.current_page + 1)
    }
}
