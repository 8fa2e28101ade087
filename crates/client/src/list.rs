//! Debounced, sequence-guarded list fetching.
//!
//! A `ListController` is what a paged table talks to: search text goes
//! through the debouncer, page changes go straight out, and whichever request
//! was issued last is the only one whose answer is published.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::sync::watch;

use cardportal_core::{ListQuery, Page, Pager};

use crate::debounce::Debouncer;
use crate::error::ApiError;
use crate::http::ApiClient;
use crate::sequence::RequestSequencer;

/// Anything that can answer a paged list query.
#[async_trait]
pub trait ListSource: Send + Sync + 'static {
    type Row: Send + Sync + 'static;

    async fn list(&self, query: &ListQuery) -> Result<Page<Self::Row>, ApiError>;
}

/// A backend list endpoint such as `/companies`.
pub struct ListEndpoint<T> {
    client: ApiClient,
    path: String,
    _row: PhantomData<fn() -> T>,
}

impl<T> ListEndpoint<T> {
    pub fn new(client: ApiClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            _row: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[async_trait]
impl<T> ListSource for ListEndpoint<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    type Row = T;

    async fn list(&self, query: &ListQuery) -> Result<Page<T>, ApiError> {
        self.client.list_page(&self.path, query).await
    }
}

/// What a table shows right now.
#[derive(Debug)]
pub struct ListState<T> {
    pub query: ListQuery,
    pub loading: bool,
    pub page: Arc<Page<T>>,
    /// Notice text of the last failure; cleared by the next success.
    pub error: Option<String>,
    /// Search text waiting out the debounce.
    pub pending: Option<String>,
}

impl<T> Clone for ListState<T> {
    fn clone(&self) -> Self {
        Self {
            query: self.query.clone(),
            loading: self.loading,
            page: self.page.clone(),
            error: self.error.clone(),
            pending: self.pending.clone(),
        }
    }
}

struct Inner<S: ListSource> {
    source: S,
    pager: Mutex<Pager>,
    search: Mutex<String>,
    seq: RequestSequencer,
    tx: watch::Sender<ListState<S::Row>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<S: ListSource> Inner<S> {
    fn query(&self) -> ListQuery {
        let search = lock(&self.search).clone();
        lock(&self.pager).query(search)
    }

    async fn fetch(&self) {
        let ticket = self.seq.issue();
        let query = self.query();
        self.tx.send_modify(|state| {
            state.loading = true;
            state.query = query.clone();
            if state.pending.as_deref() == Some(query.search.as_str()) {
                state.pending = None;
            }
        });

        let result = self.source.list(&query).await;

        if !self.seq.is_latest(ticket) {
            tracing::debug!(ticket = ticket.get(), search = %query.search, "discarding superseded list response");
            return;
        }

        match result {
            Ok(page) => {
                tracing::debug!(rows = page.data.len(), total = page.count, "list page loaded");
                self.tx.send_modify(|state| {
                    state.query = query;
                    state.loading = false;
                    state.page = Arc::new(page);
                    state.error = None;
                });
            }
            Err(err) => {
                tracing::warn!(error = %err, "list fetch failed");
                self.tx.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(err.user_message());
                });
            }
        }
    }
}

pub struct ListController<S: ListSource> {
    inner: Arc<Inner<S>>,
    search: Debouncer<String>,
}

impl<S: ListSource> ListController<S> {
    /// Must be called inside a tokio runtime (spawns the debouncer).
    pub fn new(source: S, rows_per_page: u64, quiet: Duration) -> Self {
        let pager = Pager::new(rows_per_page);
        let (tx, _rx) = watch::channel(ListState {
            query: pager.query(""),
            loading: false,
            page: Arc::new(Page::empty()),
            error: None,
            pending: None,
        });
        let inner = Arc::new(Inner {
            source,
            pager: Mutex::new(pager),
            search: Mutex::new(String::new()),
            seq: RequestSequencer::new(),
            tx,
        });

        let target = inner.clone();
        let search = Debouncer::spawn(quiet, move |text: String| {
            let inner = target.clone();
            async move {
                *lock(&inner.search) = text;
                lock(&inner.pager).reset();
                inner.fetch().await;
            }
        });

        Self { inner, search }
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState<S::Row>> {
        self.inner.tx.subscribe()
    }

    pub fn state(&self) -> ListState<S::Row> {
        self.inner.tx.borrow().clone()
    }

    pub fn pager(&self) -> Pager {
        *lock(&self.inner.pager)
    }

    /// Queue a search; the fetch happens after the quiet period.
    pub fn search(&self, text: impl Into<String>) {
        let text = text.into();
        self.inner
            .tx
            .send_modify(|state| state.pending = Some(text.clone()));
        if !self.search.push(text) {
            tracing::warn!("search debouncer stopped; input ignored");
            self.inner.tx.send_modify(|state| state.pending = None);
        }
    }

    /// Wait until no search is queued and no fetch is in flight.
    pub async fn settle(&self) -> ListState<S::Row> {
        let mut rx = self.inner.tx.subscribe();
        // `inner` owns the sender, so the channel stays open.
        match rx.wait_for(|state| !state.loading && state.pending.is_none()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    /// Fetch with the current page, size and search.
    pub async fn refresh(&self) {
        self.inner.fetch().await;
    }

    pub async fn set_page(&self, page: u64) {
        lock(&self.inner.pager).set_page(page);
        self.inner.fetch().await;
    }

    /// Changing the page size returns to the first page.
    pub async fn set_rows_per_page(&self, rows_per_page: u64) {
        lock(&self.inner.pager).set_rows_per_page(rows_per_page);
        self.inner.fetch().await;
    }
}
