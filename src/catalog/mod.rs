use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rand::Rng;
use serde::Serialize;

use crate::models::catalog::CatalogItem;

pub mod debounce;
pub mod pages;
pub mod scrape;

use debounce::Debouncer;

/// Which fields the free-text search looks at.
#[derive(Debug, Clone, Copy)]
pub struct SearchScope {
    pub title: bool,
    pub description: bool,
    pub tags: bool,
    pub category: bool,
    /// Attribute labels (case-insensitive) also searched.
    pub attributes: &'static [&'static str],
}

impl Default for SearchScope {
    fn default() -> Self {
        SearchScope {
            title: true,
            description: true,
            tags: true,
            category: true,
            attributes: &[],
        }
    }
}

impl SearchScope {
    /// `term` must already be normalized. An empty term matches everything.
    pub fn matches(&self, item: &CatalogItem, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        (self.title && contains_term(&item.title, term))
            || (self.description && contains_term(&item.description, term))
            || (self.tags && item.tags.iter().any(|t| contains_term(t, term)))
            || (self.category && contains_term(&item.category, term))
            || self.attributes.iter().any(|label| {
                item.attribute(label)
                    .map(|v| contains_term(v, term))
                    .unwrap_or(false)
            })
    }
}

fn contains_term(field: &str, term: &str) -> bool {
    field.to_lowercase().contains(term)
}

/// Category predicate; only called with a non-empty category.
pub type CategoryRule = fn(&CatalogItem, &str) -> bool;

pub fn category_equals(item: &CatalogItem, category: &str) -> bool {
    item.category == category
}

/// Static description of one listing page.
#[derive(Clone)]
pub struct PageSpec {
    /// Singular noun used in announcements ("post", "trail").
    pub noun: &'static str,
    pub scope: SearchScope,
    pub category_rule: CategoryRule,
    /// `None` shows every match at once.
    pub page_size: Option<usize>,
    /// Synthetic items "load more" may append once.
    pub reserve: Vec<CatalogItem>,
    pub debounce: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub search_term: String,
    pub category: String,
}

impl FilterState {
    pub fn normalize_search(term: &str) -> String {
        term.trim().to_lowercase()
    }

    pub fn normalize_category(category: &str) -> String {
        let c = category.trim();
        if c.eq_ignore_ascii_case("all") {
            String::new()
        } else {
            c.to_string()
        }
    }

    pub fn is_clear(&self) -> bool {
        self.search_term.is_empty() && self.category.is_empty()
    }
}

/// Screen-reader announcement channel.
pub trait Announcer: Send + Sync {
    fn announce(&self, message: &str);
}

/// Keeps the last announcement so it can be rendered into an
/// `aria-live` region.
#[derive(Debug, Default)]
pub struct LiveRegion {
    last: Mutex<Option<String>>,
}

impl LiveRegion {
    pub fn message(&self) -> Option<String> {
        self.last.lock().ok().and_then(|m| m.clone())
    }
}

impl Announcer for LiveRegion {
    fn announce(&self, message: &str) {
        if let Ok(mut last) = self.last.lock() {
            *last = Some(message.to_string());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMore {
    /// Next page of existing matches made visible.
    Revealed(usize),
    /// Synthetic reserve appended to the catalog.
    Appended(usize),
    Nothing,
}

#[derive(Debug, Serialize)]
pub struct CatalogView<'a> {
    pub items: Vec<&'a CatalogItem>,
    pub total: usize,
    pub show_load_more: bool,
    pub no_results: bool,
    pub state: &'a FilterState,
}

/// Search x category controller for one page instance.
pub struct CatalogFilter {
    spec: PageSpec,
    items: Vec<CatalogItem>,
    state: FilterState,
    /// Indices into `items`, catalog order.
    matches: Vec<usize>,
    revealed: usize,
    reserve_used: bool,
    pending_search: Debouncer<String>,
    announcer: Option<Arc<dyn Announcer>>,
}

impl CatalogFilter {
    pub fn new(spec: PageSpec, items: Vec<CatalogItem>) -> Self {
        let debounce = spec.debounce;
        let mut filter = CatalogFilter {
            spec,
            items,
            state: FilterState::default(),
            matches: Vec::new(),
            revealed: 0,
            reserve_used: false,
            pending_search: Debouncer::new(debounce),
            announcer: None,
        };
        filter.refilter();
        filter.reset_cursor();
        filter
    }

    pub fn with_announcer(mut self, announcer: Arc<dyn Announcer>) -> Self {
        self.announcer = Some(announcer);
        self
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn search_pending(&self) -> bool {
        self.pending_search.is_pending()
    }

    // ── Inputs ──────────────────────────────────────────────────────

    /// Explicit search (button, Enter key): applied at once.
    pub fn set_search(&mut self, term: &str) {
        self.pending_search.cancel();
        self.apply_search(FilterState::normalize_search(term));
    }

    /// Keystroke: applied by `poll` once the debounce window passes.
    pub fn queue_search(&mut self, term: &str, now: Instant) {
        self.pending_search
            .push(FilterState::normalize_search(term), now);
    }

    /// Returns true when a pending search was applied.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending_search.ready(now) {
            Some(term) => {
                self.apply_search(term);
                true
            }
            None => false,
        }
    }

    pub fn flush(&mut self) -> bool {
        match self.pending_search.flush() {
            Some(term) => {
                self.apply_search(term);
                true
            }
            None => false,
        }
    }

    pub fn set_category(&mut self, category: &str) {
        self.state.category = FilterState::normalize_category(category);
        self.recompute();
        let count = self.matches.len();
        let scope = if self.state.category.is_empty() {
            "all categories".to_string()
        } else {
            self.state.category.clone()
        };
        self.announce(&format!("Showing {} in {}", self.counted(count), scope));
    }

    /// Tag link: selects its category immediately.
    pub fn select_tag(&mut self, category: &str) {
        self.set_category(category);
    }

    pub fn clear_filters(&mut self) {
        self.pending_search.cancel();
        self.state = FilterState::default();
        self.recompute();
        self.announce("All filters cleared");
    }

    // ── View ────────────────────────────────────────────────────────

    /// Refilter by both predicates and reset the cursor to one page.
    pub fn recompute(&mut self) -> Vec<&CatalogItem> {
        self.refilter();
        self.reset_cursor();
        self.matched().collect()
    }

    pub fn matched(&self) -> impl Iterator<Item = &CatalogItem> + '_ {
        self.matches.iter().map(move |&i| &self.items[i])
    }

    pub fn visible_count(&self) -> usize {
        self.revealed.min(self.matches.len())
    }

    pub fn view(&self) -> CatalogView<'_> {
        let total = self.matches.len();
        CatalogView {
            items: self.matched().take(self.visible_count()).collect(),
            total,
            show_load_more: self.can_load_more(),
            no_results: total == 0,
            state: &self.state,
        }
    }

    /// Reveal the next page, or append the synthetic reserve when every
    /// match is already visible.
    pub fn load_more<R: Rng + ?Sized>(&mut self, rng: &mut R) -> LoadMore {
        let Some(size) = self.page_size() else {
            return LoadMore::Nothing;
        };

        let total = self.matches.len();
        if self.revealed < total {
            let before = self.visible_count();
            self.revealed = self.revealed.saturating_add(size);
            self.announce_more();
            return LoadMore::Revealed(self.visible_count() - before);
        }

        if self.reserve_used || self.spec.reserve.is_empty() {
            return LoadMore::Nothing;
        }
        self.reserve_used = true;
        let start = self.items.len();
        for (offset, template) in self.spec.reserve.iter().enumerate() {
            let mut item = template.clone();
            item.id = start + offset + 1;
            item.views = Some(rng.gen_range(25..325));
            item.synthetic = true;
            self.items.push(item);
        }
        let appended = self.spec.reserve.len();
        self.refilter();
        self.revealed = self.matches.len();
        self.announce_more();
        LoadMore::Appended(appended)
    }

    /// Replay request parameters: search, category, then enough
    /// "load more" steps to show at least `shown` items.
    pub fn apply_query<R: Rng + ?Sized>(
        &mut self,
        search: Option<&str>,
        category: Option<&str>,
        shown: Option<usize>,
        rng: &mut R,
    ) {
        if let Some(term) = search {
            self.set_search(term);
        }
        if let Some(cat) = category {
            self.set_category(cat);
        }
        if let Some(target) = shown {
            while self.visible_count() < target && self.can_load_more() {
                if self.load_more(rng) == LoadMore::Nothing {
                    break;
                }
            }
        }
    }

    // ── Internals ───────────────────────────────────────────────────

    fn apply_search(&mut self, term: String) {
        self.state.search_term = term;
        self.recompute();
        let count = self.matches.len();
        let message = if count == 0 {
            format!("No {}s found matching your search", self.spec.noun)
        } else {
            format!("Found {} matching your search", self.counted(count))
        };
        self.announce(&message);
    }

    fn refilter(&mut self) {
        let term = self.state.search_term.as_str();
        let category = self.state.category.as_str();
        let scope = &self.spec.scope;
        let rule = self.spec.category_rule;
        self.matches = self
            .items
            .iter()
            .enumerate()
            .filter(|&(_, item)| scope.matches(item, term))
            .filter(|&(_, item)| category.is_empty() || rule(item, category))
            .map(|(i, _)| i)
            .collect();
    }

    fn reset_cursor(&mut self) {
        self.revealed = self.page_size().unwrap_or(usize::MAX);
    }

    /// A zero page size disables pagination.
    fn page_size(&self) -> Option<usize> {
        self.spec.page_size.filter(|&size| size > 0)
    }

    /// Hidden while the matches fit on one page, and once nothing is left
    /// to reveal or synthesize.
    fn can_load_more(&self) -> bool {
        let total = self.matches.len();
        match self.page_size() {
            Some(size) => {
                total > size
                    && (self.revealed < total
                        || (!self.reserve_used && !self.spec.reserve.is_empty()))
            }
            None => false,
        }
    }

    fn counted(&self, count: usize) -> String {
        let plural = if count == 1 { "" } else { "s" };
        format!("{} {}{}", count, self.spec.noun, plural)
    }

    fn announce_more(&self) {
        self.announce(&format!("More {}s loaded", self.spec.noun));
    }

    fn announce(&self, message: &str) {
        if let Some(a) = &self.announcer {
            a.announce(message);
        }
    }
}
