use crate::fetch::PokeApi;
use crate::models::ListItem;
use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListMode {
    #[default]
    Browse,
    Search,
}

/// Snapshot of everything the list view renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    pub mode: ListMode,
    pub loading: bool,
    pub error: Option<String>,
    pub items: Vec<ListItem>,
    pub current_page: u32,
    pub total_count: u32,
    pub total_pages: u32,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            mode: ListMode::Browse,
            loading: false,
            error: None,
            items: Vec::new(),
            current_page: 1,
            total_count: 0,
            total_pages: 0,
        }
    }
}

impl ListState {
    pub fn is_searching(&self) -> bool {
        self.mode == ListMode::Search
    }
}

struct Inner {
    state: ListState,
    // ticket of the most recently issued request
    latest: u64,
}

/// Paged listing plus exact-name search over the Pokémon index.
///
/// Each operation clears the visible items and error immediately and hands back a
/// future that performs the request. Only the newest request may write its result;
/// responses for superseded requests are dropped.
#[derive(Clone)]
pub struct ListFetcher {
    api: PokeApi,
    inner: Arc<Mutex<Inner>>,
}

impl ListFetcher {
    pub fn new(api: PokeApi) -> Self {
        Self {
            api,
            inner: Arc::new(Mutex::new(Inner {
                state: ListState::default(),
                latest: 0,
            })),
        }
    }

    pub fn snapshot(&self) -> ListState {
        self.inner.lock().state.clone()
    }

    pub fn mode(&self) -> ListMode {
        self.inner.lock().state.mode
    }

    /// Load browse page `page` (1-based).
    pub fn fetch_page(&self, page: u32) -> BoxFuture<'static, ()> {
        let page = page.max(1);
        let ticket = self.begin(ListMode::Browse);
        let api = self.api.clone();
        let inner = self.inner.clone();
        let limit = api.config().page_size;
        let offset = u64::from(page - 1) * u64::from(limit);

        async move {
            let result = api.list(limit, offset).await;
            let mut guard = inner.lock();
            if guard.latest != ticket {
                log::debug!("dropping stale response for page {}", page);
                return;
            }
            let state = &mut guard.state;
            state.loading = false;
            match result {
                Ok(list) => {
                    state.total_count = list.count;
                    state.total_pages = api.config().total_pages(list.count);
                    state.items = list.results;
                    state.current_page = page;
                    state.error = None;
                }
                Err(err) => {
                    log::warn!("listing page {} failed: {}", page, err);
                    state.items.clear();
                    state.error =
                        Some(err.user_message("Failed to fetch Pokémon list", "Failed to fetch Pokémon"));
                }
            }
        }
        .boxed()
    }

    /// Exact lookup of `term`. A blank term behaves like [`ListFetcher::clear_search`].
    pub fn search(&self, term: &str) -> BoxFuture<'static, ()> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.clear_search();
        }

        let ticket = self.begin(ListMode::Search);
        let api = self.api.clone();
        let inner = self.inner.clone();

        async move {
            let result = api.pokemon(&term).await;
            let mut guard = inner.lock();
            if guard.latest != ticket {
                log::debug!("dropping stale search response for {:?}", term);
                return;
            }
            let state = &mut guard.state;
            state.loading = false;
            match result {
                Ok(raw) => {
                    state.items = vec![ListItem {
                        url: format!("{}/", api.pokemon_url(&raw.id.to_string())),
                        name: raw.name,
                    }];
                    state.error = None;
                }
                Err(err) => {
                    log::warn!("search for {:?} failed: {}", term, err);
                    state.items.clear();
                    state.error =
                        Some(err.user_message("Failed to fetch Pokémon", "Failed to search Pokémon"));
                }
            }
        }
        .boxed()
    }

    /// Leave search mode and reload the first browse page.
    pub fn clear_search(&self) -> BoxFuture<'static, ()> {
        self.fetch_page(1)
    }

    /// Enter `mode` with loading set and stale data cleared; returns the new ticket.
    fn begin(&self, mode: ListMode) -> u64 {
        let mut guard = self.inner.lock();
        guard.latest += 1;
        let state = &mut guard.state;
        state.mode = mode;
        state.loading = true;
        state.error = None;
        state.items.clear();
        guard.latest
    }
}
