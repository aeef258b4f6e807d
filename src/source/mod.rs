//! Search sources.
//!
//! This module defines the port the search session fetches pages through:
//! - [`SearchSource`] trait, injected into the session at construction
//! - [`FlickrSource`], the HTTP implementation against Flickr's REST API
//! - Wire-format decoding for `flickr.photos.search` responses

use crate::model::{FetchError, PageRequest, PaginatedResult, SearchQuery};
use async_trait::async_trait;

pub mod flickr;
pub mod response;

pub use flickr::FlickrSource;
pub use response::decode_search_response;

/// Fetches one page of results for a query.
///
/// Implementations must tolerate repeated identical calls: the session may
/// issue the same `(query, page)` again after a superseded or failed attempt.
/// Providers are not required to honor `per_page` exactly.
#[async_trait]
pub trait SearchSource: Send + Sync {
    /// Fetch `request.page` of the results for `query`.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` for any transport, status, decoding or
    /// provider-reported failure.
    async fn search(
        &self,
        query: &SearchQuery,
        request: PageRequest,
    ) -> Result<PaginatedResult, FetchError>;
}
