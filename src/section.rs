//! Per-resource catalogue section: one loader, one filter spec, one page
//! window. The filtered view is memoized and recomputed only after the
//! collection or the filter actually changed; any filter change resets the
//! window to page 1.

use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::filter::{self, Facets, FilterChange, FilterSpec};
use crate::loader::{CancelFlag, Loader, PageFetcher};
use crate::paginate::{self, PageWindow, Paged};
use crate::progress::ProgressReporter;

pub struct Section<T, F> {
    loader: Loader<T, F>,
    filter: FilterSpec,
    window: PageWindow,
    filtered: Option<Vec<T>>,
}

impl<T, F> Section<T, F>
where
    T: Facets + Clone,
    F: PageFetcher<T>,
{
    pub fn new(fetcher: F, page_size: NonZeroUsize) -> Self {
        Self {
            loader: Loader::new(fetcher),
            filter: FilterSpec::default(),
            window: PageWindow::new(page_size),
            filtered: None,
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.loader = self.loader.with_reporter(reporter);
        self
    }

    pub fn loader(&self) -> &Loader<T, F> {
        &self.loader
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn window(&self) -> &PageWindow {
        &self.window
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.loader.error()
    }

    pub async fn load_first(&mut self) {
        self.loader.fetch(1).await;
        self.filtered = None;
    }

    /// On-demand fetch of a specific server page.
    pub async fn fetch_page(&mut self, page: u32) {
        self.loader.fetch(page).await;
        self.filtered = None;
    }

    pub async fn load_more(&mut self) {
        self.loader.load_more().await;
        self.filtered = None;
    }

    pub async fn prefetch_remaining(&mut self, cancel: &CancelFlag) {
        self.loader.prefetch_remaining(cancel).await;
        self.filtered = None;
    }

    pub async fn load_all(&mut self, cancel: &CancelFlag) {
        self.loader.load_all(cancel).await;
        self.filtered = None;
    }

    /// Apply one filter mutation and reset the window to page 1.
    pub fn set_filter(&mut self, change: FilterChange) {
        self.filter.apply_change(change);
        self.filtered = None;
        self.window.reset();
    }

    /// The memoized filtered view, in collection order.
    pub fn filtered(&mut self) -> &[T] {
        if self.filtered.is_none() {
            self.filtered = Some(filter::apply_filters(self.loader.items(), &self.filter));
        }
        self.filtered.as_deref().unwrap_or(&[])
    }

    /// The currently displayed slice of the filtered view.
    pub fn page(&mut self) -> Paged<'_, T> {
        let window = self.window;
        window.page(self.filtered())
    }

    fn filtered_total_pages(&mut self) -> usize {
        let page_size = self.window.page_size;
        paginate::total_pages(self.filtered().len(), page_size)
    }

    pub fn first_page(&mut self) {
        self.window.first();
    }

    pub fn prev_page(&mut self) {
        self.window.prev();
    }

    pub fn next_page(&mut self) {
        let total = self.filtered_total_pages();
        self.window.next(total);
    }

    pub fn last_page(&mut self) {
        let total = self.filtered_total_pages();
        self.window.last(total);
    }

    pub fn jump_to(&mut self, page: usize) {
        let total = self.filtered_total_pages();
        self.window.jump_to(page, total);
    }
}
