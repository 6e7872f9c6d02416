//! Query-sync state for list views.
//!
//! Each list screen owns a [`ListState`]: the enumerated filter set for that
//! list, the current page, and the path the list lives under. The state
//! renders canonical URLs for filter controls, the search form and pagination
//! links, so the query string alone always reconstructs the visible state.
//! Keys holding their default value are never serialized, and page 1 is
//! represented by omitting `page` entirely.

use serde::{Deserialize, Serialize};

/// Sort orders shared by the list screens. `Newest` is the default and is
/// elided from query strings.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Name,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::Name => "name",
        }
    }

    pub fn is_default(&self) -> bool {
        *self == SortOrder::Newest
    }
}

impl From<&str> for SortOrder {
    fn from(value: &str) -> Self {
        match value {
            "oldest" => SortOrder::Oldest,
            "name" => SortOrder::Name,
            _ => SortOrder::Newest,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Filter {
    key: String,
    default: String,
    value: String,
}

impl Filter {
    fn is_default(&self) -> bool {
        self.value == self.default
    }
}

/// Filter/search/sort/pagination state of one list view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListState {
    path: String,
    filters: Vec<Filter>,
    page: usize,
    last_page: usize,
}

impl ListState {
    /// A state rooted at `path` with no filters registered yet.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            filters: Vec::new(),
            page: 1,
            last_page: 1,
        }
    }

    /// Registers a filter key with its default value. Registration order is
    /// the serialization order. The value starts at the default.
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, default: impl Into<String>) -> Self {
        let default = default.into();
        self.filters.push(Filter {
            key: key.into(),
            default: default.clone(),
            value: default,
        });
        self
    }

    /// Records how many pages the server reported, clamping the current page
    /// into range.
    pub fn set_last_page(&mut self, last_page: usize) {
        self.last_page = last_page.max(1);
        self.page = self.page.clamp(1, self.last_page);
    }

    /// Updates one filter. Setting a key back to its default removes it from
    /// the outgoing query string. Changing a filter returns to the first
    /// page. Unregistered keys are ignored.
    pub fn set_filter(&mut self, key: &str, value: impl Into<String>) {
        if let Some(filter) = self.filters.iter_mut().find(|f| f.key == key) {
            filter.value = value.into();
            self.page = 1;
        }
    }

    /// Commits the search box value: trimmed, applied on explicit submit.
    pub fn submit_search(&mut self, raw: &str) {
        self.set_filter("search", raw.trim());
    }

    /// Clears every filter back to its default and returns to the first page.
    pub fn reset_filters(&mut self) {
        for filter in &mut self.filters {
            filter.value = filter.default.clone();
        }
        self.page = 1;
    }

    /// Navigates to page `n`, constrained to `[1, last_page]`.
    pub fn go_to_page(&mut self, n: usize) {
        self.page = n.clamp(1, self.last_page);
    }

    /// Current value of a registered filter.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// The outgoing query string: non-default filters in registration order,
    /// then `page` when past the first. Empty when everything is default.
    pub fn query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = self
            .filters
            .iter()
            .filter(|f| !f.is_default())
            .map(|f| (f.key.as_str(), f.value.clone()))
            .collect();
        if self.page > 1 {
            pairs.push(("page", self.page.to_string()));
        }
        // Serialization over string pairs cannot fail.
        serde_html_form::to_string(&pairs).unwrap_or_default()
    }

    /// Canonical URL for the current state.
    pub fn href(&self) -> String {
        let query = self.query_string();
        if query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, query)
        }
    }

    /// Canonical URL for page `n` of the current filter set.
    pub fn page_href(&self, n: usize) -> String {
        let mut state = self.clone();
        state.go_to_page(n);
        state.href()
    }

    /// Canonical URL for the unfiltered first page.
    pub fn reset_href(&self) -> String {
        self.path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ListState {
        let mut state = ListState::new("/clients")
            .filter("search", "")
            .filter("status", "all")
            .filter("sort", "newest");
        state.set_last_page(10);
        state
    }

    #[test]
    fn default_values_are_elided() {
        let mut state = state();
        state.set_filter("sort", "newest");
        assert_eq!(state.query_string(), "");
        assert_eq!(state.href(), "/clients");

        state.set_filter("sort", "oldest");
        assert_eq!(state.query_string(), "sort=oldest");
    }

    #[test]
    fn page_one_is_omitted() {
        let mut state = state();
        state.go_to_page(3);
        assert_eq!(state.query_string(), "page=3");
        state.go_to_page(1);
        assert_eq!(state.query_string(), "");
    }

    #[test]
    fn go_to_page_is_clamped() {
        let mut state = state();
        state.go_to_page(99);
        assert_eq!(state.page(), 10);
        state.go_to_page(0);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn changing_a_filter_returns_to_first_page() {
        let mut state = state();
        state.go_to_page(4);
        state.set_filter("status", "active");
        assert_eq!(state.page(), 1);
        assert_eq!(state.query_string(), "status=active");
    }

    #[test]
    fn search_is_trimmed_and_committed_on_submit() {
        let mut state = state();
        state.submit_search("  acme corp ");
        assert_eq!(state.value("search"), Some("acme corp"));
        assert_eq!(state.query_string(), "search=acme+corp");
    }

    #[test]
    fn reset_clears_all_filters_and_page() {
        let mut state = state();
        state.submit_search("acme");
        state.set_filter("status", "active");
        state.go_to_page(2);
        state.reset_filters();
        assert_eq!(state.query_string(), "");
        assert_eq!(state.href(), "/clients");
    }

    #[test]
    fn filters_keep_registration_order() {
        let mut state = state();
        state.set_filter("sort", "name");
        state.set_filter("search", "studio");
        state.go_to_page(2);
        assert_eq!(state.query_string(), "search=studio&sort=name&page=2");
    }

    #[test]
    fn unregistered_keys_are_ignored() {
        let mut state = state();
        state.set_filter("bogus", "1");
        assert_eq!(state.query_string(), "");
    }

    #[test]
    fn page_href_preserves_filters() {
        let mut state = state();
        state.set_filter("status", "active");
        state.go_to_page(2);
        assert_eq!(state.page_href(3), "/clients?status=active&page=3");
        assert_eq!(state.page_href(1), "/clients?status=active");
    }

    #[test]
    fn sort_order_parses_with_newest_fallback() {
        assert_eq!(SortOrder::from("oldest"), SortOrder::Oldest);
        assert_eq!(SortOrder::from("anything"), SortOrder::Newest);
        assert!(SortOrder::from("newest").is_default());
    }
}
