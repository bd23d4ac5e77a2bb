use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use crate::filter::FilterChange;
use crate::loader::{CancelFlag, Loader, PageFetcher};
use crate::model::{Character, PageEnvelope};
use crate::section::Section;

#[derive(Debug, thiserror::Error)]
#[error("Error al cargar los personajes")]
struct SimulatedFailure;

/// In-memory stand-in for the remote API: fixed pages, a set of page numbers
/// that answer with a failure, and a log of requested pages.
struct ScriptedFetcher {
    pages: Vec<PageEnvelope<Character>>,
    failing: HashSet<u32>,
    calls: Mutex<Vec<u32>>,
}

impl ScriptedFetcher {
    fn new(pages: Vec<PageEnvelope<Character>>, failing: impl IntoIterator<Item = u32>) -> Self {
        Self {
            pages,
            failing: failing.into_iter().collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<u32> {
        self.calls.lock().unwrap().clone()
    }
}

impl PageFetcher<Character> for &ScriptedFetcher {
    type Error = SimulatedFailure;

    fn fetch_page(
        &self,
        page: u32,
    ) -> impl Future<Output = Result<PageEnvelope<Character>, SimulatedFailure>> + Send {
        let result = {
            self.calls.lock().unwrap().push(page);
            if self.failing.contains(&page) {
                Err(SimulatedFailure)
            } else {
                Ok(self.pages[(page - 1) as usize].clone())
            }
        };
        async move { result }
    }
}

fn character(id: u64) -> Character {
    Character {
        id,
        name: format!("character {id}"),
        age: None,
        gender: None,
        occupation: None,
        status: None,
        portrait_path: None,
        phrases: Vec::new(),
    }
}

fn envelope(ids: &[u64], count: u64, pages: u32) -> PageEnvelope<Character> {
    PageEnvelope {
        results: ids.iter().copied().map(character).collect(),
        count,
        pages,
    }
}

/// Three server pages of two characters each, ids 1 through 6.
fn three_pages() -> Vec<PageEnvelope<Character>> {
    vec![
        envelope(&[1, 2], 6, 3),
        envelope(&[3, 4], 6, 3),
        envelope(&[5, 6], 6, 3),
    ]
}

fn ids(items: &[Character]) -> Vec<u64> {
    items.iter().map(|c| c.id).collect()
}

#[tokio::test]
async fn first_page_replaces_and_load_more_appends() {
    let fetcher = ScriptedFetcher::new(three_pages(), []);
    let mut loader = Loader::new(&fetcher);

    loader.fetch(1).await;
    assert_eq!(ids(loader.items()), [1, 2]);
    assert_eq!(loader.collection().current_page(), 1);
    assert_eq!(loader.collection().total_pages(), 3);
    assert_eq!(loader.collection().total_count(), 6);

    loader.load_more().await;
    assert_eq!(ids(loader.items()), [1, 2, 3, 4]);
    assert_eq!(loader.collection().current_page(), 2);

    // Fetching page 1 again starts over.
    loader.fetch(1).await;
    assert_eq!(ids(loader.items()), [1, 2]);
    assert_eq!(loader.collection().current_page(), 1);
}

#[tokio::test]
async fn non_contiguous_page_replaces_the_collection() {
    let fetcher = ScriptedFetcher::new(three_pages(), []);
    let mut loader = Loader::new(&fetcher);

    loader.fetch(1).await;
    loader.fetch(3).await;
    assert_eq!(ids(loader.items()), [5, 6]);
    assert_eq!(loader.collection().current_page(), 3);

    // A repeat of the current page replaces too, rather than double-appending.
    loader.fetch(3).await;
    assert_eq!(ids(loader.items()), [5, 6]);
}

#[tokio::test]
async fn background_prefetch_skips_a_failed_page() {
    let fetcher = ScriptedFetcher::new(three_pages(), [2]);
    let mut loader = Loader::new(&fetcher);

    loader.fetch(1).await;
    loader.prefetch_remaining(&CancelFlag::new()).await;

    assert_eq!(ids(loader.items()), [1, 2, 5, 6]);
    assert!(!loader.is_loading());
    assert_eq!(loader.error(), None);
    assert_eq!(fetcher.calls(), [1, 2, 3]);
}

#[tokio::test]
async fn foreground_failure_is_terminal() {
    let fetcher = ScriptedFetcher::new(three_pages(), [1]);
    let mut loader = Loader::new(&fetcher);

    loader.fetch(1).await;
    assert_eq!(loader.error(), Some("Error al cargar los personajes"));
    assert!(loader.items().is_empty());
    assert!(!loader.is_loading());
}

#[tokio::test]
async fn load_all_fetches_every_page_in_order() {
    let fetcher = ScriptedFetcher::new(three_pages(), []);
    let mut loader = Loader::new(&fetcher);

    loader.load_all(&CancelFlag::new()).await;

    assert_eq!(ids(loader.items()), [1, 2, 3, 4, 5, 6]);
    assert_eq!(loader.collection().last_fetched(), Some(3));
    assert_eq!(fetcher.calls(), [1, 2, 3]);
    assert!(!loader.is_loading());
}

#[tokio::test]
async fn cancelled_prefetch_stops_before_the_next_request() {
    let fetcher = ScriptedFetcher::new(three_pages(), []);
    let mut loader = Loader::new(&fetcher);
    let cancel = CancelFlag::new();

    loader.fetch(1).await;
    cancel.cancel();
    loader.prefetch_remaining(&cancel).await;

    assert_eq!(ids(loader.items()), [1, 2]);
    assert_eq!(fetcher.calls(), [1]);
    assert!(!loader.is_loading());
}

#[tokio::test]
async fn filter_change_resets_the_page_window() {
    let fetcher = ScriptedFetcher::new(three_pages(), []);
    let mut section = Section::new(&fetcher, NonZeroUsize::new(2).unwrap());

    section.load_all(&CancelFlag::new()).await;
    section.jump_to(2);
    assert_eq!(section.window().page_index, 2);

    section.set_filter(FilterChange::SearchTerm("character".to_owned()));
    assert_eq!(section.window().page_index, 1);
    assert_eq!(section.filtered().len(), 6);
}

#[tokio::test]
async fn section_slices_the_filtered_view() {
    let ids_25: Vec<u64> = (1..=25).collect();
    let fetcher = ScriptedFetcher::new(vec![envelope(&ids_25, 25, 1)], []);
    let mut section = Section::new(&fetcher, NonZeroUsize::new(10).unwrap());

    section.load_first().await;
    section.jump_to(3);
    let page = section.page();
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.page_index, 3);
    assert_eq!(ids(page.slice), (21..=25).collect::<Vec<_>>());
}

#[tokio::test]
async fn section_surfaces_the_foreground_error() {
    let fetcher = ScriptedFetcher::new(three_pages(), [1]);
    let mut section = Section::new(&fetcher, NonZeroUsize::new(10).unwrap());

    section.load_first().await;
    assert_eq!(section.error(), Some("Error al cargar los personajes"));
    assert!(section.filtered().is_empty());
}
