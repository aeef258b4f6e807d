//! Search screen state (pure).
//!
//! `SearchUiState` is the single aggregate the search session publishes.
//! Every transition is a pure method so the fold can be tested without a
//! runtime; the session only decides *when* to apply them.

use crate::model::{PageRequest, PaginatedResult, Photo, SearchQuery, FIRST_PAGE};

/// Snapshot of the search screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchUiState {
    /// Text as typed, updated on every keystroke.
    pub query: String,
    /// First-page fetch in flight.
    pub is_loading: bool,
    /// Next-page fetch in flight.
    pub is_loading_more: bool,
    /// Results so far. Append-only across load-more within one query.
    pub items: Vec<Photo>,
    /// Last page loaded for the query (1 before any results).
    pub current_page: u32,
    /// Page count from the first page of the current query.
    pub total_pages: u32,
    /// Result count from the first page of the current query.
    pub total_items: u64,
    /// Whether `load_more` can fetch another page.
    pub has_next_page: bool,
    /// Message of the most recent failed fetch. Cleared when a fetch starts.
    pub error: Option<String>,
}

impl Default for SearchUiState {
    fn default() -> Self {
        Self {
            query: String::new(),
            is_loading: false,
            is_loading_more: false,
            items: Vec::new(),
            current_page: FIRST_PAGE,
            total_pages: 0,
            total_items: 0,
            has_next_page: false,
            error: None,
        }
    }
}

impl SearchUiState {
    /// Record new query text. Results are untouched until evaluation.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    /// Blank query evaluated: drop results and pagination, clear flags and error.
    /// The query text itself is kept.
    pub fn reset_results(&mut self) {
        self.items.clear();
        self.is_loading = false;
        self.is_loading_more = false;
        self.current_page = FIRST_PAGE;
        self.total_pages = 0;
        self.total_items = 0;
        self.has_next_page = false;
        self.error = None;
    }

    /// Non-blank query evaluated: first-page fetch starts.
    pub fn begin_search(&mut self) {
        self.is_loading = true;
        self.error = None;
        self.current_page = FIRST_PAGE;
    }

    /// First page arrived: replace results and copy all pagination counters.
    pub fn apply_first_page(&mut self, page: PaginatedResult) {
        self.has_next_page = page.has_next_page();
        self.items = page.items;
        self.is_loading = false;
        self.current_page = page.current_page;
        self.total_pages = page.total_pages;
        self.total_items = page.total_items;
    }

    /// First-page fetch failed. Items and pagination stay as they were.
    pub fn fail_search(&mut self, message: impl Into<String>) {
        self.is_loading = false;
        self.error = Some(message.into());
    }

    /// Guard and mark the start of a load-more.
    ///
    /// Returns the query and the request for the page after `current_page`,
    /// or `None` (state untouched) when a load-more is already running, there
    /// is no next page, or the current query is blank.
    pub fn begin_load_more(&mut self, per_page: u32) -> Option<(SearchQuery, PageRequest)> {
        if self.is_loading_more || !self.has_next_page {
            return None;
        }
        let query = SearchQuery::new(self.query.as_str())?;

        self.is_loading_more = true;
        self.error = None;
        Some((query, PageRequest::next_after(self.current_page, per_page)))
    }

    /// Next page arrived: append items, advance `current_page` and `has_next_page`.
    ///
    /// `total_pages` and `total_items` keep the values from the first page.
    pub fn apply_next_page(&mut self, page: PaginatedResult) {
        self.has_next_page = page.has_next_page();
        self.items.extend(page.items);
        self.is_loading_more = false;
        self.current_page = page.current_page;
    }

    /// Load-more failed. Previously loaded items are kept.
    pub fn fail_load_more(&mut self, message: impl Into<String>) {
        self.is_loading_more = false;
        self.error = Some(message.into());
    }

    /// A load-more was abandoned without a result.
    pub fn cancel_load_more(&mut self) {
        self.is_loading_more = false;
    }
}
