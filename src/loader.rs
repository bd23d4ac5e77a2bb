//! Progressive page loading.
//!
//! A `Loader` accumulates page envelopes into one in-memory `Collection`,
//! either on demand (load-more / page jump) or eagerly via a best-effort
//! background prefetch of every remaining page. Background page failures are
//! logged and skipped; only a foreground fetch failure is terminal.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::model::PageEnvelope;
use crate::progress::{LoadPhase, NullReporter, ProgressReporter};

/// Seam between page orchestration and transport, so the loader can be driven
/// by the HTTP client or by an in-memory fake.
pub trait PageFetcher<T> {
    type Error: std::fmt::Display;

    fn fetch_page(
        &self,
        page: u32,
    ) -> impl Future<Output = Result<PageEnvelope<T>, Self::Error>> + Send;
}

/// Cancellation flag for the background prefetch loop, checked before each
/// page request. The owning scope signals it on teardown.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Accumulated items plus pagination metadata, in arrival order.
///
/// Update functions consume and return the state value; readers always see a
/// consistent snapshot.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
    current_page: u32,
    total_pages: u32,
    total_count: u64,
    last_fetched: Option<u32>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Collection<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            total_pages: 1,
            total_count: 0,
            last_fetched: None,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn last_fetched(&self) -> Option<u32> {
        self.last_fetched
    }

    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Absorb an on-demand page. Page 1 replaces the collection; the next
    /// contiguous page appends; any other page (including a repeat) replaces
    /// wholesale so the reported page always matches the contents.
    pub fn absorb(mut self, page: u32, envelope: PageEnvelope<T>) -> Self {
        let contiguous = self.last_fetched.is_some_and(|last| page == last + 1);
        if page == 1 || !contiguous {
            self.items = envelope.results;
        } else {
            self.items.extend(envelope.results);
        }
        self.current_page = page.max(1);
        self.total_pages = envelope.pages.max(1);
        self.total_count = envelope.count;
        self.last_fetched = Some(page);
        self
    }

    /// Absorb a background-prefetched page: always appends, never moves the
    /// current page. The prefetch loop requests pages in increasing order, so
    /// arrival order stays collection order.
    pub fn append(mut self, page: u32, envelope: PageEnvelope<T>) -> Self {
        self.items.extend(envelope.results);
        self.total_pages = envelope.pages.max(1);
        self.total_count = envelope.count;
        self.last_fetched = Some(page);
        self
    }
}

/// Owns the collection state and drives a `PageFetcher` through it.
pub struct Loader<T, F> {
    fetcher: F,
    collection: Collection<T>,
    loading: bool,
    error: Option<String>,
    reporter: Arc<dyn ProgressReporter>,
}

impl<T, F: PageFetcher<T>> Loader<T, F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            collection: Collection::new(),
            loading: false,
            error: None,
            reporter: Arc::new(NullReporter),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    pub fn items(&self) -> &[T] {
        self.collection.items()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Terminal foreground error, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Foreground fetch of one page. On failure the error is recorded and the
    /// accumulated items are left untouched.
    pub async fn fetch(&mut self, page: u32) {
        self.loading = true;
        match self.fetcher.fetch_page(page).await {
            Ok(envelope) => {
                let collection = std::mem::take(&mut self.collection);
                self.collection = collection.absorb(page, envelope);
            }
            Err(error) => {
                self.error = Some(error.to_string());
            }
        }
        self.loading = false;
    }

    /// Fetch the next server page, if any remain.
    pub async fn load_more(&mut self) {
        if self.collection.has_more() {
            self.fetch(self.collection.current_page() + 1).await;
        }
    }

    /// Best-effort sequential prefetch of every remaining page. A page
    /// failure is logged and skipped; the overall operation never fails.
    pub async fn prefetch_remaining(&mut self, cancel: &CancelFlag) {
        let Some(first_loaded) = self.collection.last_fetched() else {
            return;
        };
        self.loading = true;
        let mut page = first_loaded + 1;
        while page <= self.collection.total_pages() {
            if cancel.is_cancelled() {
                debug!(page, "background prefetch cancelled");
                self.loading = false;
                return;
            }
            self.reporter.set_phase(LoadPhase::Prefetching {
                current: page,
                total: self.collection.total_pages(),
            });
            match self.fetcher.fetch_page(page).await {
                Ok(envelope) => {
                    let collection = std::mem::take(&mut self.collection);
                    self.collection = collection.append(page, envelope);
                }
                Err(error) => {
                    warn!(page, error = %error, "skipping page during background prefetch");
                }
            }
            page += 1;
        }
        self.loading = false;
        self.reporter.set_phase(LoadPhase::Complete);
    }

    /// First page in the foreground, then everything else in a best-effort
    /// prefetch. A first-page failure is terminal and skips the prefetch.
    pub async fn load_all(&mut self, cancel: &CancelFlag) {
        self.reporter.set_phase(LoadPhase::FetchingFirst);
        self.fetch(1).await;
        match &self.error {
            Some(error) => self.reporter.set_phase(LoadPhase::Failed(error.clone())),
            None => self.prefetch_remaining(cancel).await,
        }
    }
}
