//! HTTP search source for Flickr's `photos.search` REST method.

use super::{response::decode_search_response, SearchSource};
use crate::config::ResolvedConfig;
use crate::model::{FetchError, PageRequest, PaginatedResult, SearchQuery};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

const SEARCH_METHOD: &str = "flickr.photos.search";

/// Flickr REST client.
///
/// One GET per fetch. Static parameters (method, API key, JSON format
/// without JSONP callback) are added to every request.
#[derive(Debug, Clone)]
pub struct FlickrSource {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl FlickrSource {
    /// Create a source for `endpoint` (e.g. `https://api.flickr.com/services/rest/`).
    ///
    /// `timeout` bounds each request; `None` leaves requests unbounded.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Transport` if the HTTP client cannot be built
    /// (e.g. TLS backend initialization failure).
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    /// Create a source from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if no API key is configured, or
    /// `AppError::Fetch` if the HTTP client cannot be built.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, crate::model::AppError> {
        let api_key = config.require_api_key()?;
        Ok(Self::new(
            config.base_url.clone(),
            api_key,
            config.request_timeout(),
        )?)
    }

    /// Query string for one search call, static parameters first.
    pub fn query_params(
        &self,
        query: &SearchQuery,
        request: PageRequest,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("method", SEARCH_METHOD.to_string()),
            ("api_key", self.api_key.clone()),
            ("format", "json".to_string()),
            ("nojsoncallback", "1".to_string()),
            ("text", query.as_str().to_string()),
            ("page", request.page.to_string()),
            ("per_page", request.per_page.to_string()),
        ]
    }
}

#[async_trait]
impl SearchSource for FlickrSource {
    async fn search(
        &self,
        query: &SearchQuery,
        request: PageRequest,
    ) -> Result<PaginatedResult, FetchError> {
        debug!(
            query = %query,
            page = request.page,
            per_page = request.per_page,
            "Requesting search page"
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&self.query_params(query, request))
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        decode_search_response(&body)
    }
}
