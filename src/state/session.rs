//! Search session: debounced, latest-wins paginated search.
//!
//! The session owns one [`SearchUiState`] cell (a `tokio::sync::watch`
//! channel) and a background pipeline task. Intents write to the cell
//! directly; the pipeline watches the `query` field, debounces it, and
//! folds fetch results back into the cell.
//!
//! # Pipeline
//!
//! 1. A change of `query` (not of any other field) restarts the debounce timer.
//! 2. When the timer fires, a value equal to the previously evaluated one is
//!    dropped.
//! 3. A blank value resets results without fetching; a non-blank one starts a
//!    page-1 fetch.
//! 4. Starting an evaluation drops the previous evaluation's fetch future, so
//!    only the latest evaluation can write results. An in-flight load-more is
//!    dropped as well, and a queued one from before the evaluation is
//!    discarded when it reaches the pipeline.
//!
//! Fetches are not time-bounded here. A source that never resolves leaves
//! `is_loading` / `is_loading_more` set until the next evaluation.

use super::SearchUiState;
use crate::config::ResolvedConfig;
use crate::model::{FetchError, PageRequest, PaginatedResult, SearchQuery, DEFAULT_PER_PAGE};
use crate::source::SearchSource;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

/// Quiet period before a query change is evaluated.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Tunables for a [`SearchSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Quiet period after the last query change.
    pub debounce: Duration,
    /// Page size for every fetch.
    pub per_page: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl SessionOptions {
    /// Debounce and page size from resolved configuration.
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            debounce: config.debounce(),
            per_page: config.per_page,
        }
    }
}

type FetchFuture = Pin<Box<dyn Future<Output = Result<PaginatedResult, FetchError>> + Send>>;

/// Work the intents hand to the pipeline.
#[derive(Debug)]
enum Command {
    LoadMore {
        query: SearchQuery,
        request: PageRequest,
        /// Evaluation the request was made against.
        generation: u64,
    },
}

// ===== SearchSession =====

/// Handle to a running search session.
///
/// Intents never block. Effects are observed through [`subscribe`](Self::subscribe)
/// or [`snapshot`](Self::snapshot). Dropping the handle stops the pipeline.
pub struct SearchSession {
    state: Arc<watch::Sender<SearchUiState>>,
    commands: mpsc::UnboundedSender<Command>,
    generation: Arc<AtomicU64>,
    per_page: u32,
    task: JoinHandle<()>,
}

impl SearchSession {
    /// Start a session fetching through `source`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn(source: Arc<dyn SearchSource>, options: SessionOptions) -> Self {
        let (state_tx, state_rx) = watch::channel(SearchUiState::default());
        let state = Arc::new(state_tx);
        let (commands, command_rx) = mpsc::unbounded_channel();
        let generation = Arc::new(AtomicU64::new(0));

        let pipeline = Pipeline {
            source,
            options,
            state: Arc::clone(&state),
            generation: Arc::clone(&generation),
        };
        let task = tokio::spawn(pipeline.run(state_rx, command_rx));

        Self {
            state,
            commands,
            generation,
            per_page: options.per_page,
            task,
        }
    }

    /// Record new query text. The search itself runs after the debounce period.
    pub fn set_query(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_if_modified(|state| {
            if state.query == text {
                return false;
            }
            state.set_query(text);
            true
        });
    }

    /// Same as `set_query("")`.
    pub fn clear(&self) {
        self.set_query(String::new());
    }

    /// Fetch the page after `current_page` for the current query.
    ///
    /// No-op while a load-more is running, when there is no next page, or
    /// when the query is blank.
    pub fn load_more(&self) {
        let mut next = None;
        self.state.send_if_modified(|state| {
            // Read under the state lock so it pairs with the snapshot used.
            let generation = self.generation.load(Ordering::SeqCst);
            next = state
                .begin_load_more(self.per_page)
                .map(|(query, request)| (query, request, generation));
            next.is_some()
        });

        let Some((query, request, generation)) = next else {
            return;
        };
        debug!(query = %query, page = request.page, "Load-more requested");
        let command = Command::LoadMore {
            query,
            request,
            generation,
        };
        if self.commands.send(command).is_err() {
            // Pipeline is gone; nothing will ever finish this load-more.
            self.state.send_modify(SearchUiState::cancel_load_more);
        }
    }

    /// Receiver that starts at the current snapshot and sees every later one.
    pub fn subscribe(&self) -> watch::Receiver<SearchUiState> {
        self.state.subscribe()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SearchUiState {
        self.state.borrow().clone()
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// ===== Pipeline =====

struct Pipeline {
    source: Arc<dyn SearchSource>,
    options: SessionOptions,
    state: Arc<watch::Sender<SearchUiState>>,
    /// Bumped under the state lock by every evaluation.
    generation: Arc<AtomicU64>,
}

impl Pipeline {
    async fn run(
        self,
        mut state_rx: watch::Receiver<SearchUiState>,
        mut commands: mpsc::UnboundedReceiver<Command>,
    ) {
        let mut observed_query = state_rx.borrow_and_update().query.clone();
        let mut pending = Some(observed_query.clone());
        let mut last_evaluated: Option<String> = None;
        let mut search: Option<FetchFuture> = None;
        let mut load_more: Option<FetchFuture> = None;

        let debounce = sleep_until(Instant::now() + self.options.debounce);
        tokio::pin!(debounce);

        loop {
            tokio::select! {
                changed = state_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let query = state_rx.borrow_and_update().query.clone();
                    if query != observed_query {
                        observed_query.clone_from(&query);
                        pending = Some(query);
                        debounce.as_mut().reset(Instant::now() + self.options.debounce);
                    }
                }
                () = &mut debounce, if pending.is_some() => {
                    let Some(query) = pending.take() else { continue };
                    if last_evaluated.as_deref() == Some(query.as_str()) {
                        debug!(query = %query, "Debounced query unchanged, skipping");
                        continue;
                    }
                    if search.take().is_some() {
                        debug!("Superseding in-flight search");
                    }
                    if load_more.take().is_some() {
                        debug!("Dropping in-flight load-more for previous query");
                        self.state.send_modify(SearchUiState::cancel_load_more);
                    }
                    search = self.evaluate(&query);
                    last_evaluated = Some(query);
                }
                command = commands.recv() => match command {
                    Some(Command::LoadMore { query, request, generation }) => {
                        if generation == self.generation.load(Ordering::SeqCst) {
                            load_more = Some(self.fetch(query, request));
                        } else {
                            debug!(query = %query, "Dropping load-more queued before the latest evaluation");
                            self.state.send_modify(SearchUiState::cancel_load_more);
                        }
                    }
                    None => break,
                },
                outcome = poll_slot(&mut search) => {
                    search = None;
                    self.finish_search(outcome);
                }
                outcome = poll_slot(&mut load_more) => {
                    load_more = None;
                    self.finish_load_more(outcome);
                }
            }
        }
    }

    /// Evaluate a debounced query, returning the page-1 fetch if one is needed.
    fn evaluate(&self, raw: &str) -> Option<FetchFuture> {
        let Some(query) = SearchQuery::new(raw) else {
            debug!("Blank query, clearing results");
            self.state.send_modify(|state| {
                self.generation.fetch_add(1, Ordering::SeqCst);
                state.reset_results();
            });
            return None;
        };

        info!(query = %query, "Searching");
        self.state.send_modify(|state| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            state.begin_search();
        });
        Some(self.fetch(query, PageRequest::first(self.options.per_page)))
    }

    fn fetch(&self, query: SearchQuery, request: PageRequest) -> FetchFuture {
        let source = Arc::clone(&self.source);
        Box::pin(async move { source.search(&query, request).await })
    }

    fn finish_search(&self, outcome: Result<PaginatedResult, FetchError>) {
        match outcome {
            Ok(page) => {
                info!(
                    items = page.items.len(),
                    total_pages = page.total_pages,
                    total_items = page.total_items,
                    "First page loaded"
                );
                self.state.send_modify(|state| state.apply_first_page(page));
            }
            Err(err) => {
                warn!(error = %err, "Search failed");
                self.state.send_modify(|state| state.fail_search(err.to_string()));
            }
        }
    }

    fn finish_load_more(&self, outcome: Result<PaginatedResult, FetchError>) {
        match outcome {
            Ok(page) => {
                info!(
                    items = page.items.len(),
                    page = page.current_page,
                    "Next page loaded"
                );
                self.state.send_modify(|state| state.apply_next_page(page));
            }
            Err(err) => {
                warn!(error = %err, "Load-more failed");
                self.state.send_modify(|state| state.fail_load_more(err.to_string()));
            }
        }
    }
}

/// Await the fetch in `slot`, or never resolve if the slot is empty.
async fn poll_slot(slot: &mut Option<FetchFuture>) -> Result<PaginatedResult, FetchError> {
    match slot {
        Some(fetch) => fetch.await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
