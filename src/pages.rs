use crate::detail::{DetailFetcher, DetailState};
use crate::fetch::PokeApi;
use crate::list::{ListFetcher, ListMode, ListState};
use crate::router::{History, Location};
use futures::future::BoxFuture;

/// Browse/search screen bound to the `page` query parameter.
pub struct ListPage {
    fetcher: ListFetcher,
    pub search_term: String,
}

impl ListPage {
    /// Mount at `location`, loading the page it names.
    pub fn mount(api: PokeApi, location: &Location) -> (Self, BoxFuture<'static, ()>) {
        let page = Self {
            fetcher: ListFetcher::new(api),
            search_term: String::new(),
        };
        let initial = location.page();
        log::info!("list page mounted at page {}", initial);
        let pending = page.fetcher.fetch_page(initial);
        (page, pending)
    }

    pub fn state(&self) -> ListState {
        self.fetcher.snapshot()
    }

    pub fn search(&mut self, term: &str) -> BoxFuture<'static, ()> {
        self.search_term = term.to_string();
        self.fetcher.search(term)
    }

    pub fn clear_search(&mut self) -> BoxFuture<'static, ()> {
        self.search_term.clear();
        self.fetcher.clear_search()
    }

    /// Jump to `page`, rewriting the current location's `page` parameter.
    /// Ignored while a search is active.
    pub fn change_page(&self, page: u32, history: &mut History) -> Option<BoxFuture<'static, ()>> {
        if self.fetcher.mode() == ListMode::Search {
            log::debug!("page change to {} ignored during search", page);
            return None;
        }
        let page = page.max(1);
        let mut location = history.current().clone();
        location.set_query_param("page", &page.to_string());
        history.replace(location);
        Some(self.fetcher.fetch_page(page))
    }

    pub fn next_page(&self, history: &mut History) -> Option<BoxFuture<'static, ()>> {
        let state = self.fetcher.snapshot();
        if state.is_searching() || state.current_page >= state.total_pages {
            return None;
        }
        self.change_page(state.current_page + 1, history)
    }

    pub fn previous_page(&self, history: &mut History) -> Option<BoxFuture<'static, ()>> {
        let state = self.fetcher.snapshot();
        if state.is_searching() || state.current_page <= 1 {
            return None;
        }
        self.change_page(state.current_page - 1, history)
    }

    /// Open the detail route for `name`.
    pub fn select(&self, name: &str, history: &mut History) {
        history.push(Location::detail(name));
    }
}

/// Single-Pokémon screen; everything is delegated to [`DetailFetcher`].
pub struct DetailPage {
    fetcher: DetailFetcher,
}

impl DetailPage {
    pub fn mount(api: PokeApi, name: &str) -> (Self, BoxFuture<'static, ()>) {
        let fetcher = DetailFetcher::new(api);
        let pending = fetcher.set_name(Some(name));
        (Self { fetcher }, pending)
    }

    pub fn state(&self) -> DetailState {
        self.fetcher.snapshot()
    }

    pub fn refetch(&self) -> BoxFuture<'static, ()> {
        self.fetcher.refetch()
    }

    /// Return to the list, restoring its previous location (and page) when known.
    pub fn back(&self, history: &mut History) {
        if !history.back() {
            history.replace(Location::list());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DexConfig;
    use crate::router::Route;
    use mockito::Matcher;
    use serde_json::json;

    fn api_for(server: &mockito::ServerGuard) -> PokeApi {
        PokeApi::new(DexConfig::with_base_url(server.url()))
    }

    fn page_mock(offset: u32) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "20".into()),
            Matcher::UrlEncoded("offset".into(), offset.to_string()),
        ])
    }

    fn body(count: u32, name: &str) -> String {
        json!({ "count": count, "results": [{ "name": name, "url": "https://pokeapi.co/api/v2/pokemon/1/" }] })
            .to_string()
    }

    #[tokio::test]
    async fn mounts_at_page_from_location_without_loading_page_one() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", "/pokemon")
            .match_query(page_mock(0))
            .expect(0)
            .create_async()
            .await;
        let third = server
            .mock("GET", "/pokemon")
            .match_query(page_mock(40))
            .with_status(200)
            .with_body(body(100, "third"))
            .create_async()
            .await;

        let (page, pending) = ListPage::mount(api_for(&server), &Location::parse("/?page=3"));
        pending.await;

        first.assert_async().await;
        third.assert_async().await;
        assert_eq!(page.state().current_page, 3);
    }

    #[tokio::test]
    async fn huge_page_in_location_requests_large_offset() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/pokemon")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "20".into()),
                Matcher::UrlEncoded("offset".into(), "5999999980".into()),
            ]))
            .with_status(200)
            .with_body(json!({ "count": 1302, "results": [] }).to_string())
            .create_async()
            .await;

        let (page, pending) =
            ListPage::mount(api_for(&server), &Location::parse("/?page=300000000"));
        pending.await;
        mock.assert_async().await;

        let state = page.state();
        assert_eq!(state.current_page, 300_000_000);
        assert_eq!(state.total_pages, 66);
        assert!(state.items.is_empty());
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn page_changes_rewrite_location_in_place() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/pokemon")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(body(100, "any"))
            .create_async()
            .await;

        let mut history = History::new(Location::list());
        let (page, pending) = ListPage::mount(api_for(&server), history.current());
        pending.await;

        page.next_page(&mut history).expect("next page allowed").await;
        assert_eq!(page.state().current_page, 2);
        assert_eq!(history.current().to_string(), "/?page=2");

        page.change_page(5, &mut history).expect("explicit page allowed").await;
        page.previous_page(&mut history).expect("previous allowed").await;
        assert_eq!(page.state().current_page, 4);
        assert_eq!(history.current().to_string(), "/?page=4");
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn edges_of_range_are_not_crossed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/pokemon")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(body(40, "any"))
            .create_async()
            .await;

        let mut history = History::new(Location::list());
        let (page, pending) = ListPage::mount(api_for(&server), history.current());
        pending.await;
        assert!(page.previous_page(&mut history).is_none());

        page.next_page(&mut history).expect("page 2 exists").await;
        assert!(page.next_page(&mut history).is_none());
    }

    #[tokio::test]
    async fn page_changes_ignored_while_searching() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/pokemon")
            .match_query(page_mock(0))
            .with_status(200)
            .with_body(body(100, "first"))
            .create_async()
            .await;
        server
            .mock("GET", "/pokemon/pikachu")
            .with_status(200)
            .with_body(r#"{"id": 25, "name": "pikachu"}"#)
            .create_async()
            .await;
        let other_pages = server
            .mock("GET", "/pokemon")
            .match_query(Matcher::Regex("offset=[1-9]".to_string()))
            .expect(0)
            .create_async()
            .await;

        let mut history = History::new(Location::list());
        let (mut page, pending) = ListPage::mount(api_for(&server), history.current());
        pending.await;
        page.search("Pikachu").await;
        let before = page.state();

        assert!(page.next_page(&mut history).is_none());
        assert!(page.previous_page(&mut history).is_none());
        assert!(page.change_page(4, &mut history).is_none());

        other_pages.assert_async().await;
        assert_eq!(page.state(), before);
        assert_eq!(page.state().mode, ListMode::Search);
        assert_eq!(page.search_term, "Pikachu");
        assert_eq!(history.current().to_string(), "/");

        page.clear_search().await;
        assert!(page.search_term.is_empty());
        assert_eq!(page.state().mode, ListMode::Browse);
    }

    #[tokio::test]
    async fn select_then_back_restores_list_location() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/pokemon/pikachu")
            .with_status(200)
            .with_body(r#"{"id": 25, "name": "pikachu"}"#)
            .create_async()
            .await;

        let mut history = History::new(Location::parse("/?page=3"));
        let (list, _pending) = ListPage::mount(api_for(&server), history.current());
        list.select("pikachu", &mut history);
        assert_eq!(
            history.current().route(),
            Some(Route::Detail {
                name: "pikachu".to_string()
            })
        );

        let (detail, pending) = DetailPage::mount(api_for(&server), "pikachu");
        pending.await;
        assert_eq!(detail.state().pokemon().map(|p| p.id), Some(25));

        detail.back(&mut history);
        assert_eq!(history.current().to_string(), "/?page=3");
    }

    #[test]
    fn back_without_previous_entry_goes_to_list() {
        let api = PokeApi::new(DexConfig::default());
        let page = DetailPage {
            fetcher: DetailFetcher::new(api),
        };
        let mut history = History::new(Location::detail("pikachu"));
        page.back(&mut history);
        assert_eq!(history.current(), &Location::list());
    }
}
