//! Client-side pagination over the (possibly filtered) collection.
//!
//! The page size here is independent of the server-side page size; slicing is
//! pure arithmetic over whatever sequence the caller hands in.

use std::num::NonZeroUsize;

/// One displayed page of a collection.
#[derive(Debug, PartialEq, Eq)]
pub struct Paged<'a, T> {
    pub slice: &'a [T],
    /// The effective (clamped) page index, 1-based.
    pub page_index: usize,
    pub total_pages: usize,
}

/// Total page count for a collection of `len` items, minimum 1.
pub fn total_pages(len: usize, page_size: NonZeroUsize) -> usize {
    len.div_ceil(page_size.get()).max(1)
}

/// Slice out one page. An out-of-range `page_index` is clamped into
/// `[1, total_pages]`, never an error.
pub fn paginate<T>(items: &[T], page_size: NonZeroUsize, page_index: usize) -> Paged<'_, T> {
    let total = total_pages(items.len(), page_size);
    let page_index = page_index.clamp(1, total);
    let start = ((page_index - 1) * page_size.get()).min(items.len());
    let end = (start + page_size.get()).min(items.len());
    Paged {
        slice: &items[start..end],
        page_index,
        total_pages: total,
    }
}

/// Client-side view slicing parameters, one per catalogue section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page_size: NonZeroUsize,
    /// 1-based; clamped against the current total on every navigation.
    pub page_index: usize,
}

impl PageWindow {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            page_size,
            page_index: 1,
        }
    }

    /// Back to page 1, e.g. after the filtered source changed.
    pub fn reset(&mut self) {
        self.page_index = 1;
    }

    pub fn first(&mut self) {
        self.page_index = 1;
    }

    pub fn prev(&mut self) {
        self.page_index = self.page_index.saturating_sub(1).max(1);
    }

    pub fn next(&mut self, total_pages: usize) {
        self.page_index = (self.page_index + 1).min(total_pages.max(1));
    }

    pub fn last(&mut self, total_pages: usize) {
        self.page_index = total_pages.max(1);
    }

    pub fn jump_to(&mut self, page: usize, total_pages: usize) {
        self.page_index = page.clamp(1, total_pages.max(1));
    }

    /// The slice this window selects from `items`.
    pub fn page<'a, T>(&self, items: &'a [T]) -> Paged<'a, T> {
        paginate(items, self.page_size, self.page_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn twenty_five_items_page_three_has_the_last_five() {
        let items: Vec<usize> = (0..25).collect();
        let page = paginate(&items, size(10), 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page_index, 3);
        assert_eq!(page.slice, &items[20..25]);
    }

    #[test]
    fn out_of_range_indices_clamp() {
        let items: Vec<usize> = (0..25).collect();
        let below = paginate(&items, size(10), 0);
        assert_eq!(below.page_index, 1);
        assert_eq!(below.slice, &items[0..10]);
        let above = paginate(&items, size(10), 99);
        assert_eq!(above.page_index, 3);
        assert_eq!(above.slice, &items[20..25]);
    }

    #[test]
    fn empty_collection_still_has_one_page() {
        let items: Vec<usize> = Vec::new();
        let page = paginate(&items, size(10), 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.slice.is_empty());
    }

    #[test]
    fn concatenated_pages_reconstruct_the_collection() {
        let items: Vec<usize> = (0..37).collect();
        let page_size = size(7);
        let mut seen = Vec::new();
        for index in 1..=total_pages(items.len(), page_size) {
            seen.extend_from_slice(paginate(&items, page_size, index).slice);
        }
        assert_eq!(seen, items);
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut window = PageWindow::new(size(10));
        window.prev();
        assert_eq!(window.page_index, 1);
        window.next(3);
        assert_eq!(window.page_index, 2);
        window.last(3);
        assert_eq!(window.page_index, 3);
        window.next(3);
        assert_eq!(window.page_index, 3);
        window.jump_to(99, 3);
        assert_eq!(window.page_index, 3);
        window.jump_to(0, 3);
        assert_eq!(window.page_index, 1);
        window.first();
        assert_eq!(window.page_index, 1);
    }
}
