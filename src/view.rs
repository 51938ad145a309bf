//! Result view: reconciles sequential pagination and filtered search over
//! one displayed list.
//!
//! [`ViewState`] is the single per-session state object. [`ResultView`]
//! holds no state of its own; every handler takes the state by `&mut`, so
//! the TUI, the simple line mode and the tests all drive the same logic.

use crate::dataset::{DatasetProvider, Query};
use crate::entry::WordEntry;
use crate::normalize::Normalizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browsing,
    Searching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    LoadingPage,
    SearchPending,
    Rendered,
}

/// Message shown in place of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    DatasetEmpty,
    NoResults,
    QueryFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Total(usize),
    Matches { total: usize, shown: usize },
}

/// What a handler did to the displayed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Preconditions not met; nothing changed.
    Skipped,
    Appended(usize),
    /// No rows left; `has_more` is now false.
    Exhausted,
    Replaced { shown: usize, total: usize },
    Failed,
}

#[derive(Debug, Clone, Copy)]
pub struct ViewSettings {
    pub per_page: usize,
    pub search_limit: usize,
    pub prefetch_rows: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            per_page: 100,
            search_limit: 100,
            prefetch_rows: 20,
        }
    }
}

#[derive(Debug)]
pub struct ViewState {
    mode: Mode,
    cursor: usize,
    has_more: bool,
    is_loading: bool,
    total_count: usize,
    phase: Phase,
    rows: Vec<WordEntry>,
    notice: Option<Notice>,
    query: Option<Query>,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Browsing,
            cursor: 0,
            has_more: true,
            is_loading: false,
            total_count: 0,
            phase: Phase::Idle,
            rows: Vec::new(),
            notice: None,
            query: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[cfg(test)]
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[cfg(test)]
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rows(&self) -> &[WordEntry] {
        &self.rows
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    #[cfg(test)]
    pub fn query(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    pub fn status(&self) -> Status {
        match self.mode {
            Mode::Browsing => Status::Total(self.total_count),
            Mode::Searching => Status::Matches {
                total: self.total_count,
                shown: self.rows.len(),
            },
        }
    }

    fn needs_repopulating(&self) -> bool {
        self.rows.is_empty() && matches!(self.notice, Some(Notice::QueryFailed(_)))
    }

    fn enter(&mut self, phase: Phase) {
        tracing::trace!(from = ?self.phase, to = ?phase, "phase");
        self.phase = phase;
    }

    fn reset_browsing(&mut self) {
        self.mode = Mode::Browsing;
        self.cursor = 0;
        self.has_more = true;
        self.query = None;
        self.enter(Phase::Idle);
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ResultView<'a> {
    provider: &'a dyn DatasetProvider,
    normalizer: &'a dyn Normalizer,
    settings: ViewSettings,
}

impl<'a> ResultView<'a> {
    pub fn new(
        provider: &'a dyn DatasetProvider,
        normalizer: &'a dyn Normalizer,
        settings: ViewSettings,
    ) -> Self {
        Self {
            provider,
            normalizer,
            settings,
        }
    }

    /// Append the next page while browsing. A no-op while loading, after the
    /// last page, or in search mode.
    pub fn load_next_page(&self, state: &mut ViewState) -> Outcome {
        if state.is_loading || !state.has_more || state.mode != Mode::Browsing {
            return Outcome::Skipped;
        }

        let per_page = self.settings.per_page.max(1);
        let offset = state.cursor * per_page;
        let first_page = state.cursor == 0;

        state.is_loading = true;
        state.enter(Phase::LoadingPage);
        let result = self.provider.page(offset, per_page);
        let count = first_page.then(|| self.provider.count());
        state.is_loading = false;
        state.enter(Phase::Rendered);

        let outcome = match result {
            Err(e) => {
                tracing::warn!(error = %e, offset, "page load failed");
                // A failed continuation keeps what is already on screen.
                if first_page {
                    state.rows.clear();
                    state.notice = Some(Notice::QueryFailed(e.to_string()));
                }
                Outcome::Failed
            }
            Ok(rows) if rows.is_empty() => {
                tracing::debug!(offset, "no more rows");
                state.has_more = false;
                if first_page {
                    state.rows.clear();
                    state.notice = Some(Notice::DatasetEmpty);
                }
                Outcome::Exhausted
            }
            Ok(rows) => {
                let fetched = rows.len();
                tracing::debug!(offset, fetched, "page loaded");
                if first_page {
                    state.rows.clear();
                    state.notice = None;
                }
                state.rows.extend(rows);
                if fetched < per_page {
                    state.has_more = false;
                } else {
                    state.cursor += 1;
                }
                Outcome::Appended(fetched)
            }
        };

        match count {
            Some(Ok(total)) => state.total_count = total,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "count failed");
                state.total_count = 0;
                if state.notice.is_none() {
                    state.notice = Some(Notice::QueryFailed(e.to_string()));
                }
            }
            None => {}
        }
        outcome
    }

    /// Replace the list with the first `search_limit` matches for `raw`.
    pub fn run_search(&self, state: &mut ViewState, raw: &str) -> Outcome {
        if state.is_loading {
            return Outcome::Skipped;
        }
        let Some(query) = Query::parse(raw, self.normalizer) else {
            return Outcome::Skipped;
        };
        tracing::debug!(query = query.raw(), needle = query.needle(), "searching");

        state.is_loading = true;
        state.enter(Phase::SearchPending);
        state.mode = Mode::Searching;
        let result = self
            .provider
            .search(&query, self.settings.search_limit)
            .and_then(|rows| self.provider.search_count(&query).map(|total| (rows, total)));
        state.query = Some(query);
        state.is_loading = false;
        state.enter(Phase::Rendered);

        match result {
            Ok((rows, total)) => {
                let shown = rows.len();
                tracing::debug!(query = raw, shown, total, "search finished");
                state.notice = if rows.is_empty() { Some(Notice::NoResults) } else { None };
                state.rows = rows;
                state.total_count = total;
                Outcome::Replaced { shown, total }
            }
            Err(e) => {
                tracing::warn!(error = %e, query = raw, "search failed");
                state.rows.clear();
                state.total_count = 0;
                state.notice = Some(Notice::QueryFailed(e.to_string()));
                Outcome::Failed
            }
        }
    }

    /// Back to browsing from the first page.
    pub fn clear_search(&self, state: &mut ViewState) -> Outcome {
        if state.is_loading {
            return Outcome::Skipped;
        }
        if let Some(query) = &state.query {
            tracing::debug!(query = query.raw(), "clearing search");
        }
        state.reset_browsing();
        self.load_next_page(state)
    }

    /// Route a debounced input value: blank input leaves search mode or
    /// reloads a list whose first page failed, anything else searches.
    pub fn dispatch(&self, state: &mut ViewState, raw: &str) -> Outcome {
        if Query::parse(raw, self.normalizer).is_some() {
            self.run_search(state, raw)
        } else if state.mode == Mode::Searching || state.needs_repopulating() {
            self.clear_search(state)
        } else {
            Outcome::Skipped
        }
    }

    /// Load more when the visible window reaches the prefetch threshold.
    pub fn on_scroll(
        &self,
        state: &mut ViewState,
        viewport_height: usize,
        scroll_offset: usize,
    ) -> Outcome {
        let threshold = self.settings.prefetch_rows;
        if near_bottom(viewport_height, scroll_offset, state.rows.len(), threshold) {
            self.load_next_page(state)
        } else {
            Outcome::Skipped
        }
    }
}

pub fn near_bottom(
    viewport_height: usize,
    scroll_offset: usize,
    content_len: usize,
    threshold: usize,
) -> bool {
    viewport_height + scroll_offset + threshold >= content_len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::MemoryDataset;
    use crate::error::QueryError;
    use crate::normalize::{default_aliases, Pipeline};
    use std::cell::Cell;
    use std::sync::Arc;

    fn entries(n: usize) -> Vec<WordEntry> {
        (0..n).map(|i| WordEntry::new(format!("слово{i}"), format!("word{i}"))).collect()
    }

    fn normalizer() -> Arc<dyn Normalizer> {
        Arc::new(Pipeline::with_aliases(&default_aliases()))
    }

    fn settings(per_page: usize) -> ViewSettings {
        ViewSettings {
            per_page,
            search_limit: 100,
            prefetch_rows: 5,
        }
    }

    /// Wraps a dataset and fails every call while `fail` is set, or only
    /// `count` while `fail_count` is set.
    struct Flaky {
        inner: MemoryDataset,
        fail: Cell<bool>,
        fail_count: Cell<bool>,
    }

    impl Flaky {
        fn new(inner: MemoryDataset, fail: bool) -> Self {
            Self {
                inner,
                fail: Cell::new(fail),
                fail_count: Cell::new(false),
            }
        }

        fn check(&self) -> Result<(), QueryError> {
            if self.fail.get() {
                Err(QueryError::Execution("store unavailable".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl DatasetProvider for Flaky {
        fn count(&self) -> Result<usize, QueryError> {
            self.check()?;
            if self.fail_count.get() {
                return Err(QueryError::Execution("count unavailable".to_string()));
            }
            self.inner.count()
        }
        fn page(&self, offset: usize, limit: usize) -> Result<Vec<WordEntry>, QueryError> {
            self.check()?;
            self.inner.page(offset, limit)
        }
        fn search(&self, query: &Query, limit: usize) -> Result<Vec<WordEntry>, QueryError> {
            self.check()?;
            self.inner.search(query, limit)
        }
        fn search_count(&self, query: &Query) -> Result<usize, QueryError> {
            self.check()?;
            self.inner.search_count(query)
        }
    }

    #[test]
    fn test_pages_of_250() {
        let norm = normalizer();
        let ds = MemoryDataset::new(entries(250), Arc::clone(&norm));
        let view = ResultView::new(&ds, norm.as_ref(), settings(100));
        let mut state = ViewState::new();
        assert_eq!(state.phase(), Phase::Idle);

        assert_eq!(view.load_next_page(&mut state), Outcome::Appended(100));
        assert!(state.has_more());
        assert_eq!(state.cursor(), 1);
        assert_eq!(view.load_next_page(&mut state), Outcome::Appended(100));
        assert!(state.has_more());
        assert_eq!(view.load_next_page(&mut state), Outcome::Appended(50));
        assert!(!state.has_more());
        assert_eq!(view.load_next_page(&mut state), Outcome::Skipped);

        assert_eq!(state.rows(), entries(250).as_slice());
        assert_eq!(state.status(), Status::Total(250));
        assert_eq!(state.phase(), Phase::Rendered);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_exact_multiple_ends_on_empty_page() {
        let norm = normalizer();
        let ds = MemoryDataset::new(entries(20), Arc::clone(&norm));
        let view = ResultView::new(&ds, norm.as_ref(), settings(10));
        let mut state = ViewState::new();

        assert_eq!(view.load_next_page(&mut state), Outcome::Appended(10));
        assert_eq!(view.load_next_page(&mut state), Outcome::Appended(10));
        assert!(state.has_more());
        assert_eq!(view.load_next_page(&mut state), Outcome::Exhausted);
        assert!(!state.has_more());
        assert_eq!(state.rows().len(), 20);
        assert_eq!(state.notice(), None);
    }

    #[test]
    fn test_empty_dataset_notice() {
        let norm = normalizer();
        let ds = MemoryDataset::new(Vec::new(), Arc::clone(&norm));
        let view = ResultView::new(&ds, norm.as_ref(), settings(10));
        let mut state = ViewState::new();
        assert_eq!(view.load_next_page(&mut state), Outcome::Exhausted);
        assert_eq!(state.notice(), Some(&Notice::DatasetEmpty));
        assert_eq!(state.status(), Status::Total(0));
    }

    #[test]
    fn test_loading_guard_rejects_triggers() {
        let norm = normalizer();
        let ds = MemoryDataset::new(entries(30), Arc::clone(&norm));
        let view = ResultView::new(&ds, norm.as_ref(), settings(10));
        let mut state = ViewState::new();
        state.is_loading = true;
        assert_eq!(view.load_next_page(&mut state), Outcome::Skipped);
        assert_eq!(view.run_search(&mut state, "слово"), Outcome::Skipped);
        assert_eq!(view.clear_search(&mut state), Outcome::Skipped);
        assert!(state.rows().is_empty());
    }

    #[test]
    fn test_search_replaces_and_suppresses_paging() {
        let norm = normalizer();
        let ds = MemoryDataset::new(entries(250), Arc::clone(&norm));
        let view = ResultView::new(&ds, norm.as_ref(), settings(100));
        let mut state = ViewState::new();
        view.load_next_page(&mut state);

        // "слово1" matches 1, 10-19, 100-199: 111 rows
        let outcome = view.run_search(&mut state, "СЛОВО1");
        assert_eq!(outcome, Outcome::Replaced { shown: 100, total: 111 });
        assert_eq!(state.mode(), Mode::Searching);
        assert_eq!(state.rows().len(), 100);
        assert_eq!(state.rows()[0].term, "слово1");
        assert_eq!(state.status(), Status::Matches { total: 111, shown: 100 });
        assert_eq!(state.query().map(|q| q.needle()), Some("слово1"));

        assert_eq!(view.load_next_page(&mut state), Outcome::Skipped);
        assert_eq!(view.on_scroll(&mut state, 100, 100), Outcome::Skipped);
        assert_eq!(state.rows().len(), 100);
    }

    #[test]
    fn test_search_without_matches() {
        let norm = normalizer();
        let ds = MemoryDataset::new(entries(50), Arc::clone(&norm));
        let view = ResultView::new(&ds, norm.as_ref(), settings(10));
        let mut state = ViewState::new();
        view.load_next_page(&mut state);

        let outcome = view.run_search(&mut state, "xyz123");
        assert_eq!(outcome, Outcome::Replaced { shown: 0, total: 0 });
        assert!(state.rows().is_empty());
        assert_eq!(state.notice(), Some(&Notice::NoResults));
        assert_eq!(state.status(), Status::Matches { total: 0, shown: 0 });
    }

    #[test]
    fn test_search_is_idempotent() {
        let norm = normalizer();
        let ds = MemoryDataset::new(entries(250), Arc::clone(&norm));
        let view = ResultView::new(&ds, norm.as_ref(), settings(100));
        let mut state = ViewState::new();

        let first = view.run_search(&mut state, "word2");
        let first_rows = state.rows().to_vec();
        let second = view.run_search(&mut state, "  WORD2 ");
        assert_eq!(first, second);
        assert_eq!(state.rows(), first_rows.as_slice());
    }

    #[test]
    fn test_clear_restores_fresh_first_page() {
        let norm = normalizer();
        let ds = MemoryDataset::new(entries(250), Arc::clone(&norm));
        let view = ResultView::new(&ds, norm.as_ref(), settings(100));

        let mut fresh = ViewState::new();
        view.load_next_page(&mut fresh);

        let mut state = ViewState::new();
        view.load_next_page(&mut state);
        view.load_next_page(&mut state);
        view.run_search(&mut state, "xyz123");
        assert_eq!(view.clear_search(&mut state), Outcome::Appended(100));

        assert_eq!(state.mode(), Mode::Browsing);
        assert_eq!(state.rows(), fresh.rows());
        assert_eq!(state.cursor(), fresh.cursor());
        assert!(state.has_more());
        assert_eq!(state.notice(), None);
        assert_eq!(state.status(), Status::Total(250));
        assert!(state.query().is_none());
    }

    #[test]
    fn test_clear_after_exhaustion_restarts_paging() {
        let norm = normalizer();
        let ds = MemoryDataset::new(entries(15), Arc::clone(&norm));
        let view = ResultView::new(&ds, norm.as_ref(), settings(10));
        let mut state = ViewState::new();
        view.load_next_page(&mut state);
        view.load_next_page(&mut state);
        assert!(!state.has_more());

        view.run_search(&mut state, "слово");
        view.clear_search(&mut state);
        assert!(state.has_more());
        assert_eq!(view.load_next_page(&mut state), Outcome::Appended(5));
        assert_eq!(state.rows(), entries(15).as_slice());
    }

    #[test]
    fn test_dispatch_routes_input() {
        let norm = normalizer();
        let ds = MemoryDataset::new(entries(30), Arc::clone(&norm));
        let view = ResultView::new(&ds, norm.as_ref(), settings(10));
        let mut state = ViewState::new();
        view.load_next_page(&mut state);

        // Blank input while browsing leaves the list alone.
        assert_eq!(view.dispatch(&mut state, "   "), Outcome::Skipped);
        assert_eq!(state.rows().len(), 10);

        assert!(matches!(view.dispatch(&mut state, "word2"), Outcome::Replaced { .. }));
        assert_eq!(view.dispatch(&mut state, ""), Outcome::Appended(10));
        assert_eq!(state.mode(), Mode::Browsing);
    }

    #[test]
    fn test_on_scroll_threshold() {
        let norm = normalizer();
        let ds = MemoryDataset::new(entries(100), Arc::clone(&norm));
        let view = ResultView::new(&ds, norm.as_ref(), settings(30));
        let mut state = ViewState::new();
        view.load_next_page(&mut state);

        // 30 rows loaded, 10 visible from the top, threshold 5: not yet.
        assert_eq!(view.on_scroll(&mut state, 10, 0), Outcome::Skipped);
        assert_eq!(view.on_scroll(&mut state, 10, 15), Outcome::Appended(30));
        assert_eq!(state.rows().len(), 60);
    }

    #[test]
    fn test_near_bottom() {
        assert!(near_bottom(10, 0, 0, 0));
        assert!(near_bottom(10, 5, 20, 5));
        assert!(!near_bottom(10, 4, 20, 5));
    }

    #[test]
    fn test_failed_continuation_keeps_list() {
        let norm = normalizer();
        let ds = Flaky::new(MemoryDataset::new(entries(30), Arc::clone(&norm)), false);
        let view = ResultView::new(&ds, norm.as_ref(), settings(10));
        let mut state = ViewState::new();
        view.load_next_page(&mut state);

        ds.fail.set(true);
        assert_eq!(view.load_next_page(&mut state), Outcome::Failed);
        assert_eq!(state.rows(), &entries(30)[..10]);
        assert!(state.has_more());
        assert!(!state.is_loading());
        assert_eq!(state.notice(), None);

        // Next trigger retries implicitly.
        ds.fail.set(false);
        assert_eq!(view.load_next_page(&mut state), Outcome::Appended(10));
        assert_eq!(state.rows(), &entries(30)[..20]);
    }

    #[test]
    fn test_failed_search_shows_empty_state() {
        let norm = normalizer();
        let ds = Flaky::new(MemoryDataset::new(entries(30), Arc::clone(&norm)), false);
        let view = ResultView::new(&ds, norm.as_ref(), settings(10));
        let mut state = ViewState::new();
        view.load_next_page(&mut state);

        ds.fail.set(true);
        assert_eq!(view.run_search(&mut state, "word"), Outcome::Failed);
        assert!(state.rows().is_empty());
        assert!(matches!(state.notice(), Some(Notice::QueryFailed(_))));
        assert_eq!(state.mode(), Mode::Searching);

        ds.fail.set(false);
        assert!(matches!(view.run_search(&mut state, "word"), Outcome::Replaced { .. }));
        assert_eq!(state.notice(), None);
    }

    #[test]
    fn test_failed_first_page_shows_empty_state() {
        let norm = normalizer();
        let ds = Flaky::new(MemoryDataset::new(entries(30), Arc::clone(&norm)), true);
        let view = ResultView::new(&ds, norm.as_ref(), settings(10));
        let mut state = ViewState::new();
        assert_eq!(view.load_next_page(&mut state), Outcome::Failed);
        assert!(matches!(state.notice(), Some(Notice::QueryFailed(_))));
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_display_capitalization_leaves_match_form() {
        let norm = normalizer();
        let ds = MemoryDataset::new(vec![WordEntry::new("slovo", "word")], Arc::clone(&norm));
        let view = ResultView::new(&ds, norm.as_ref(), settings(10));
        let mut state = ViewState::new();
        view.run_search(&mut state, "slovo");
        assert_eq!(state.rows()[0].display_term(), "Slovo");
        assert_eq!(state.rows()[0].term, "slovo");
        assert_eq!(state.query().map(|q| q.needle()), Some("slovo"));
    }

    #[test]
    fn test_blank_input_reloads_after_failed_first_page() {
        let norm = normalizer();
        let ds = Flaky::new(MemoryDataset::new(entries(30), Arc::clone(&norm)), true);
        let view = ResultView::new(&ds, norm.as_ref(), settings(10));
        let mut state = ViewState::new();
        assert_eq!(view.load_next_page(&mut state), Outcome::Failed);
        assert_eq!(state.mode(), Mode::Browsing);

        ds.fail.set(false);
        assert_eq!(view.dispatch(&mut state, ""), Outcome::Appended(10));
        assert_eq!(state.rows(), &entries(30)[..10]);
        assert_eq!(state.notice(), None);
        assert_eq!(state.status(), Status::Total(30));

        // Once the list is populated, blank input is a no-op again.
        assert_eq!(view.dispatch(&mut state, " "), Outcome::Skipped);
    }

    #[test]
    fn test_failed_count_resets_total() {
        let norm = normalizer();
        let ds = Flaky::new(MemoryDataset::new(entries(30), Arc::clone(&norm)), false);
        let view = ResultView::new(&ds, norm.as_ref(), settings(10));
        let mut state = ViewState::new();
        view.load_next_page(&mut state);
        view.run_search(&mut state, "слово");
        assert_eq!(state.total_count(), 30);

        ds.fail_count.set(true);
        assert_eq!(view.clear_search(&mut state), Outcome::Appended(10));
        assert_eq!(state.rows().len(), 10);
        assert_eq!(state.status(), Status::Total(0));
        assert!(matches!(state.notice(), Some(Notice::QueryFailed(_))));

        ds.fail_count.set(false);
        view.clear_search(&mut state);
        assert_eq!(state.status(), Status::Total(30));
        assert_eq!(state.notice(), None);
    }
}
