//! DTO modules that bridge services with templates.

use serde::Serialize;

use crate::listing::ListState;
use crate::pagination::Page;

pub mod clients;
pub mod dashboard;
pub mod invoices;
pub mod leads;
pub mod projects;

/// One rendered pagination control: a numbered link or an ellipsis.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageLink {
    pub number: Option<usize>,
    pub href: Option<String>,
    pub current: bool,
}

/// Pagination controls resolved against the list's canonical URLs.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Pager {
    pub links: Vec<PageLink>,
    pub prev: Option<String>,
    pub next: Option<String>,
}

/// Builds the pager for a page envelope; empty links mean no controls render.
pub fn pager<T>(state: &ListState, page: &Page<T>) -> Pager {
    let links = page
        .pages
        .iter()
        .map(|entry| match entry {
            Some(n) => PageLink {
                number: Some(*n),
                href: Some(state.page_href(*n)),
                current: *n == page.current_page,
            },
            None => PageLink {
                number: None,
                href: None,
                current: false,
            },
        })
        .collect();
    Pager {
        links,
        prev: page.prev_page().map(|n| state.page_href(n)),
        next: page.next_page().map(|n| state.page_href(n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pager_marks_current_and_renders_ellipsis() {
        let mut state = ListState::new("/invoices").filter("sort", "newest");
        state.set_last_page(10);
        state.go_to_page(5);
        let page: Page<u8> = Page::new(vec![0; 20], 200, 5, 20);
        let pager = pager(&state, &page);
        assert_eq!(pager.links.len(), 7);
        assert!(pager.links[1].number.is_none());
        assert!(pager.links[3].current);
        assert_eq!(pager.prev.as_deref(), Some("/invoices?page=4"));
        assert_eq!(pager.next.as_deref(), Some("/invoices?page=6"));
    }

    #[test]
    fn single_page_has_no_links() {
        let state = ListState::new("/invoices");
        let page: Page<u8> = Page::new(vec![1], 1, 1, 20);
        let pager = pager(&state, &page);
        assert!(pager.links.is_empty());
        assert!(pager.prev.is_none());
        assert!(pager.next.is_none());
    }
}
