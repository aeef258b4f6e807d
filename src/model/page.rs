//! Pagination types: one fetched page and the parameters that request it.

use super::Photo;

/// Page size used when the caller does not pick one.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// First page number. Pages are 1-based.
pub const FIRST_PAGE: u32 = 1;

// ===== PaginatedResult =====

/// One page of search results plus the provider's pagination counters.
///
/// Construction is total. The mapping layer is responsible for passing
/// sensible counters; inconsistent ones (e.g. `current_page > total_pages`)
/// are carried as-is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaginatedResult {
    /// Photos on this page, in provider order.
    pub items: Vec<Photo>,
    /// 1-based number of this page.
    pub current_page: u32,
    /// Number of pages the provider reports for the query.
    pub total_pages: u32,
    /// Number of matching photos across all pages.
    pub total_items: u64,
}

impl PaginatedResult {
    /// Wrap a page of photos with its counters.
    pub fn new(items: Vec<Photo>, current_page: u32, total_pages: u32, total_items: u64) -> Self {
        Self {
            items,
            current_page,
            total_pages,
            total_items,
        }
    }

    /// Whether another page exists after this one.
    ///
    /// Zero total pages never has a next page, whatever `current_page` says.
    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }
}

// ===== PageRequest =====

/// Which page to fetch and how large it should be.
///
/// Providers are not required to honor `per_page` exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Requested page size, at least 1.
    pub per_page: u32,
}

impl PageRequest {
    /// Request `page` with `per_page` results.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// Page 1 with the given size.
    pub fn first(per_page: u32) -> Self {
        Self::new(FIRST_PAGE, per_page)
    }

    /// The page following `current_page`.
    pub fn next_after(current_page: u32, per_page: u32) -> Self {
        Self::new(current_page.saturating_add(1), per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PER_PAGE)
    }
}
