//! Harness for driving a SearchSession from integration tests.
//!
//! `FakeSource` answers from a table keyed by `(query, page)` and records
//! every call. Tests run under paused Tokio time, so scripted delays are
//! virtual.

#![allow(dead_code)]

use async_trait::async_trait;
use photosearch::model::{FetchError, PageRequest, PaginatedResult, Photo, SearchQuery};
use photosearch::source::SearchSource;
use photosearch::state::{SearchSession, SearchUiState, SessionOptions};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type PageKey = (String, u32);

#[derive(Default)]
pub struct FakeSource {
    responses: Mutex<HashMap<PageKey, (Duration, Result<PaginatedResult, FetchError>)>>,
    calls: Mutex<Vec<(String, PageRequest)>>,
}

impl FakeSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, query: &str, page: u32, result: Result<PaginatedResult, FetchError>) {
        self.respond_after(query, page, Duration::ZERO, result);
    }

    pub fn respond_after(
        &self,
        query: &str,
        page: u32,
        delay: Duration,
        result: Result<PaginatedResult, FetchError>,
    ) {
        self.responses
            .lock()
            .unwrap()
            .insert((query.to_string(), page), (delay, result));
    }

    pub fn calls(&self) -> Vec<(String, PageRequest)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl SearchSource for FakeSource {
    async fn search(
        &self,
        query: &SearchQuery,
        request: PageRequest,
    ) -> Result<PaginatedResult, FetchError> {
        let key = (query.as_str().to_string(), request.page);
        self.calls.lock().unwrap().push((key.0.clone(), request));

        let scripted = self.responses.lock().unwrap().get(&key).cloned();
        let Some((delay, result)) = scripted else {
            return Err(FetchError::Transport(format!("unexpected fetch {key:?}")));
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

// ===== SearchHarness =====

/// A running session plus its fake source.
pub struct SearchHarness {
    pub source: Arc<FakeSource>,
    pub session: SearchSession,
}

impl SearchHarness {
    pub fn start(source: Arc<FakeSource>) -> Self {
        let session = SearchSession::spawn(source.clone(), SessionOptions::default());
        Self { source, session }
    }

    pub fn state(&self) -> SearchUiState {
        self.session.snapshot()
    }

    /// Let the pipeline task run without moving the clock.
    pub async fn settle(&self) {
        for _ in 0..32 {
            tokio::task::yield_now().await;
        }
    }

    /// Move virtual time forward and let the pipeline react.
    pub async fn advance(&self, ms: u64) {
        tokio::time::advance(Duration::from_millis(ms)).await;
        self.settle().await;
    }

    /// Wait (in virtual time) until the state satisfies `pred`.
    pub async fn until(&self, pred: impl FnMut(&SearchUiState) -> bool) -> SearchUiState {
        let mut rx = self.session.subscribe();
        let state = rx.wait_for(pred).await.expect("session alive").clone();
        state
    }
}

// ===== Fixtures =====

pub fn photo(id: &str) -> Photo {
    Photo::from_flickr(1, "server", id, "secret")
}

pub fn page(ids: &[&str], current_page: u32, total_pages: u32, total_items: u64) -> PaginatedResult {
    PaginatedResult::new(
        ids.iter().map(|id| photo(id)).collect(),
        current_page,
        total_pages,
        total_items,
    )
}
