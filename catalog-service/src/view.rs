//! Client-side paginated view over an aggregated collection
//!
//! [`CatalogView`] keeps the full collection it was loaded with, re-applies the
//! search and sort from that full set on every change, and pages the result in
//! slices of [`ITEMS_PER_PAGE`].

use std::fmt;

use crate::browse::{apply, Record, SearchFilter, SortSpec};

/// Products shown per client-side page
pub const ITEMS_PER_PAGE: usize = 12;

/// Where the view is in its load cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Failed,
    Loaded,
}

/// Paginated, filtered and sorted view of a collection
#[derive(Debug, Clone)]
pub struct CatalogView<T> {
    all: Vec<T>,
    visible: Vec<T>,
    filter: SearchFilter,
    sort: SortSpec,
    page: usize,
    state: LoadState,
}

impl<T> Default for CatalogView<T> {
    fn default() -> Self {
        Self {
            all: Vec::new(),
            visible: Vec::new(),
            filter: SearchFilter::default(),
            sort: SortSpec::default(),
            page: 1,
            state: LoadState::Loading,
        }
    }
}

impl<T: Record + Clone> CatalogView<T> {
    /// An empty view waiting for data
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the collection and show its first page
    pub fn load(&mut self, items: Vec<T>) {
        self.all = items;
        self.state = LoadState::Loaded;
        self.refresh();
    }

    /// Mark the load as failed, dropping anything previously shown
    pub fn fail(&mut self) {
        self.all.clear();
        self.visible.clear();
        self.page = 1;
        self.state = LoadState::Failed;
    }

    pub fn set_filter(&mut self, filter: SearchFilter) {
        self.filter = filter;
        self.refresh();
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.visible = apply(&self.all, &self.filter, &self.sort);
        self.page = 1;
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn filter(&self) -> &SearchFilter {
        &self.filter
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    /// Current page number, 1-indexed
    pub fn page(&self) -> usize {
        self.page
    }

    /// Number of items matching the current filter
    pub fn result_count(&self) -> usize {
        self.visible.len()
    }

    /// `ceil(result_count / ITEMS_PER_PAGE)`; zero when nothing matches
    pub fn total_pages(&self) -> usize {
        self.visible.len().div_ceil(ITEMS_PER_PAGE)
    }

    /// Items on the current page
    pub fn items(&self) -> &[T] {
        let start = (self.page - 1) * ITEMS_PER_PAGE;
        let end = (start + ITEMS_PER_PAGE).min(self.visible.len());
        self.visible.get(start..end).unwrap_or(&[])
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Jump to `page`, clamped to `1..=total_pages`
    pub fn go_to(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages().max(1));
    }

    pub fn next_page(&mut self) {
        self.go_to(self.page + 1);
    }

    pub fn previous_page(&mut self) {
        self.go_to(self.page.saturating_sub(1));
    }

    /// Message for a state with nothing to list, if any
    pub fn notice(&self) -> Option<&'static str> {
        match self.state {
            LoadState::Loading => Some("Loading products..."),
            LoadState::Failed => Some("Failed to load products"),
            LoadState::Loaded if self.visible.is_empty() => Some("No products match the criteria"),
            LoadState::Loaded => None,
        }
    }

    /// "N product(s) found"
    pub fn count_label(&self) -> String {
        format!("{} product(s) found", self.result_count())
    }

    /// "Page X of Y", only when there is something to page through
    pub fn page_label(&self) -> Option<String> {
        (self.total_pages() > 0).then(|| format!("Page {} of {}", self.page, self.total_pages()))
    }
}

impl<T: Record + Clone> fmt::Display for CatalogView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(notice) = self.notice() {
            return f.write_str(notice);
        }
        write!(f, "{}", self.count_label())?;
        if let Some(label) = self.page_label() {
            write!(f, " | {}", label)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::{SortKey, SortOrder};
    use crate::models::Product;

    fn products(n: i64) -> Vec<Product> {
        (1..=n)
            .map(|id| Product {
                id,
                name: if id % 2 == 0 {
                    format!("Phone {}", id)
                } else {
                    format!("Lamp {}", id)
                },
                description: String::new(),
                price: format!("{}.00", id),
                status: Default::default(),
                category: None,
            })
            .collect()
    }

    fn loaded(n: i64) -> CatalogView<Product> {
        let mut view = CatalogView::new();
        view.load(products(n));
        view
    }

    #[test]
    fn test_new_view_is_loading() {
        let view: CatalogView<Product> = CatalogView::new();
        assert_eq!(view.state(), LoadState::Loading);
        assert_eq!(view.notice(), Some("Loading products..."));
        assert_eq!(view.sort(), SortSpec::new(SortKey::Id, SortOrder::Desc));
    }

    #[test]
    fn test_pages_of_twelve() {
        let mut view = loaded(30);
        assert_eq!(view.total_pages(), 3);
        assert_eq!(view.items().len(), 12);
        assert_eq!(view.items()[0].id, 30);
        assert_eq!(view.page_label().as_deref(), Some("Page 1 of 3"));

        view.go_to(3);
        assert_eq!(view.items().len(), 6);
        assert!(view.has_previous());
        assert!(!view.has_next());
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut view = loaded(30);

        view.previous_page();
        assert_eq!(view.page(), 1);

        view.go_to(99);
        assert_eq!(view.page(), 3);
        view.next_page();
        assert_eq!(view.page(), 3);

        view.go_to(0);
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut view = loaded(30);
        view.go_to(2);

        view.set_filter(SearchFilter::new("phone"));
        assert_eq!(view.page(), 1);
        assert_eq!(view.result_count(), 15);
        assert_eq!(view.count_label(), "15 product(s) found");

        view.go_to(2);
        view.set_sort(SortSpec::new(SortKey::Price, SortOrder::Asc));
        assert_eq!(view.page(), 1);
        assert_eq!(view.items()[0].id, 2);
    }

    #[test]
    fn test_filter_reapplies_from_full_set() {
        let mut view = loaded(4);
        view.set_filter(SearchFilter::new("phone"));
        assert_eq!(view.result_count(), 2);
        view.set_filter(SearchFilter::new("lamp"));
        assert_eq!(view.result_count(), 2);
        view.set_filter(SearchFilter::default());
        assert_eq!(view.result_count(), 4);
    }

    #[test]
    fn test_no_match_state() {
        let mut view = loaded(5);
        view.set_filter(SearchFilter::new("television"));

        assert_eq!(view.total_pages(), 0);
        assert!(view.items().is_empty());
        assert_eq!(view.page_label(), None);
        assert_eq!(view.to_string(), "No products match the criteria");

        view.next_page();
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn test_failed_state() {
        let mut view = loaded(5);
        view.fail();
        assert_eq!(view.state(), LoadState::Failed);
        assert!(view.items().is_empty());
        assert_eq!(view.to_string(), "Failed to load products");
    }

    #[test]
    fn test_display_summary() {
        let view = loaded(13);
        assert_eq!(view.to_string(), "13 product(s) found | Page 1 of 2");
    }
}
