//! Test doubles for search session tests.
//!
//! `ScriptedSource` answers from a table keyed by `(query, page)`, records
//! every call, and can delay or hang individual pages so tests can drive
//! supersession and loading flags under paused Tokio time.

use crate::model::{FetchError, PageRequest, PaginatedResult, Photo, SearchQuery};
use crate::source::SearchSource;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type PageKey = (String, u32);

#[derive(Default)]
pub struct ScriptedSource {
    responses: Mutex<HashMap<PageKey, Result<PaginatedResult, FetchError>>>,
    delays: Mutex<HashMap<PageKey, Duration>>,
    hung: Mutex<HashSet<PageKey>>,
    calls: Mutex<Vec<(String, PageRequest)>>,
}

impl ScriptedSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, query: &str, page: u32, result: Result<PaginatedResult, FetchError>) {
        self.responses
            .lock()
            .unwrap()
            .insert((query.to_string(), page), result);
    }

    pub fn delay(&self, query: &str, page: u32, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .insert((query.to_string(), page), delay);
    }

    /// Make `(query, page)` never resolve.
    pub fn hang(&self, query: &str, page: u32) {
        self.hung.lock().unwrap().insert((query.to_string(), page));
    }

    pub fn calls(&self) -> Vec<(String, PageRequest)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl SearchSource for ScriptedSource {
    async fn search(
        &self,
        query: &SearchQuery,
        request: PageRequest,
    ) -> Result<PaginatedResult, FetchError> {
        let key = (query.as_str().to_string(), request.page);
        self.calls
            .lock()
            .unwrap()
            .push((key.0.clone(), request));

        let hung = self.hung.lock().unwrap().contains(&key);
        if hung {
            std::future::pending::<()>().await;
        }
        let delay = self.delays.lock().unwrap().get(&key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.responses
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| {
                Err(FetchError::Decode(format!(
                    "no scripted response for {:?} page {}",
                    key.0, key.1
                )))
            })
    }
}

/// Photo with a predictable URL.
pub fn photo(id: &str) -> Photo {
    Photo::new(id, format!("https://example.com/{id}.jpg"))
}

/// Page of photos with the given ids and counters.
pub fn page(ids: &[&str], current_page: u32, total_pages: u32, total_items: u64) -> PaginatedResult {
    PaginatedResult::new(
        ids.iter().map(|id| photo(id)).collect(),
        current_page,
        total_pages,
        total_items,
    )
}
