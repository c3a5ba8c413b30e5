use crate::error::{DexError, NOT_FOUND_MESSAGE};
use crate::fetch::PokeApi;
use crate::models::Pokemon;
use crate::transform::transform_pokemon;
use futures::future::{self, BoxFuture, FutureExt};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailState {
    /// No name selected.
    #[default]
    Idle,
    Loading,
    Ready(Pokemon),
    NotFound,
    Failed(String),
}

impl DetailState {
    pub fn loading(&self) -> bool {
        matches!(self, DetailState::Loading)
    }

    pub fn pokemon(&self) -> Option<&Pokemon> {
        match self {
            DetailState::Ready(p) => Some(p),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DetailState::NotFound => Some(NOT_FOUND_MESSAGE),
            DetailState::Failed(msg) => Some(msg.as_str()),
            _ => None,
        }
    }
}

struct Inner {
    name: Option<String>,
    state: DetailState,
    latest: u64,
}

/// Loads one Pokémon at a time by name.
#[derive(Clone)]
pub struct DetailFetcher {
    api: PokeApi,
    inner: Arc<Mutex<Inner>>,
}

impl DetailFetcher {
    pub fn new(api: PokeApi) -> Self {
        Self {
            api,
            inner: Arc::new(Mutex::new(Inner {
                name: None,
                state: DetailState::Idle,
                latest: 0,
            })),
        }
    }

    pub fn snapshot(&self) -> DetailState {
        self.inner.lock().state.clone()
    }

    pub fn name(&self) -> Option<String> {
        self.inner.lock().name.clone()
    }

    /// Switch to `name` and load it; `None` returns to idle without a request.
    pub fn set_name(&self, name: Option<&str>) -> BoxFuture<'static, ()> {
        let name = name.filter(|n| !n.is_empty()).map(str::to_string);
        {
            let mut guard = self.inner.lock();
            guard.name = name.clone();
            if name.is_none() {
                // supersede anything still in flight
                guard.latest += 1;
                guard.state = DetailState::Idle;
            }
        }
        match name {
            Some(name) => self.load(name),
            None => future::ready(()).boxed(),
        }
    }

    /// Reload the current name. No-op while idle.
    pub fn refetch(&self) -> BoxFuture<'static, ()> {
        match self.name() {
            Some(name) => self.load(name),
            None => future::ready(()).boxed(),
        }
    }

    fn load(&self, name: String) -> BoxFuture<'static, ()> {
        let ticket = {
            let mut guard = self.inner.lock();
            guard.latest += 1;
            guard.state = DetailState::Loading;
            guard.latest
        };
        let api = self.api.clone();
        let inner = self.inner.clone();

        async move {
            let result = api.pokemon(&name).await;
            let mut guard = inner.lock();
            if guard.latest != ticket {
                log::debug!("dropping stale detail response for {:?}", name);
                return;
            }
            guard.state = match result {
                Ok(raw) => DetailState::Ready(transform_pokemon(&raw)),
                Err(DexError::NotFound) => {
                    log::info!("pokemon {:?} not found", name);
                    DetailState::NotFound
                }
                Err(err) => {
                    log::warn!("loading {:?} failed: {}", name, err);
                    DetailState::Failed(err.user_message(
                        "Failed to fetch Pokémon details",
                        "Failed to fetch Pokémon details",
                    ))
                }
            };
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DexConfig;
    use crate::models::Stats;

    fn fetcher_for(server: &mockito::ServerGuard) -> DetailFetcher {
        DetailFetcher::new(PokeApi::new(DexConfig::with_base_url(server.url())))
    }

    const PIKACHU: &str = r#"{
        "id": 25,
        "name": "pikachu",
        "height": 4,
        "weight": 60,
        "sprites": { "front_default": "front.png", "other": { "official-artwork": { "front_default": null } } },
        "types": [{ "type": { "name": "electric" } }],
        "abilities": [{ "ability": { "name": "static" } }],
        "stats": [{ "stat": { "name": "speed" }, "base_stat": 90 }]
    }"#;

    #[tokio::test]
    async fn ready_with_partial_stats() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/pokemon/pikachu")
            .with_status(200)
            .with_body(PIKACHU)
            .create_async()
            .await;

        let fetcher = fetcher_for(&server);
        fetcher.set_name(Some("pikachu")).await;

        let state = fetcher.snapshot();
        let p = state.pokemon().expect("pokemon loaded");
        assert_eq!(
            p.stats,
            Stats {
                hp: 0,
                attack: 0,
                defense: 0,
                special_attack: 0,
                special_defense: 0,
                speed: 90,
            }
        );
        assert_eq!(p.image_url, "front.png");
        assert_eq!(p.types, vec!["electric"]);
        assert_eq!(state.error(), None);
    }

    #[tokio::test]
    async fn not_found_is_distinct_from_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/pokemon/missingno")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/pokemon/glitch")
            .with_status(500)
            .create_async()
            .await;

        let fetcher = fetcher_for(&server);
        fetcher.set_name(Some("MissingNo")).await;
        assert_eq!(fetcher.snapshot(), DetailState::NotFound);
        assert_eq!(fetcher.snapshot().error(), Some("Pokémon not found"));

        fetcher.set_name(Some("glitch")).await;
        assert_eq!(
            fetcher.snapshot(),
            DetailState::Failed("Failed to fetch Pokémon details: Internal Server Error".to_string())
        );
        assert!(fetcher.snapshot().pokemon().is_none());
    }

    #[tokio::test]
    async fn undecodable_body_is_a_failure_with_its_own_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/pokemon/pikachu")
            .with_status(200)
            .with_body("{\"id\": \"twenty-five\"}")
            .create_async()
            .await;

        let fetcher = fetcher_for(&server);
        fetcher.set_name(Some("pikachu")).await;

        let state = fetcher.snapshot();
        assert!(!state.loading());
        assert!(state.pokemon().is_none());
        let error = match &state {
            DetailState::Failed(msg) => msg.clone(),
            other => panic!("unexpected state: {:?}", other),
        };
        assert_ne!(error, "Pokémon not found");
        assert!(!error.starts_with("Failed to fetch Pokémon details:"));
        assert!(!error.trim().is_empty());
    }

    #[tokio::test]
    async fn refetch_yields_same_pokemon() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/pokemon/pikachu")
            .with_status(200)
            .with_body(PIKACHU)
            .expect(2)
            .create_async()
            .await;

        let fetcher = fetcher_for(&server);
        fetcher.set_name(Some("pikachu")).await;
        let first = fetcher.snapshot();
        fetcher.refetch().await;
        mock.assert_async().await;
        assert_eq!(first, fetcher.snapshot());
        assert!(first.pokemon().is_some());
    }

    #[tokio::test]
    async fn idle_without_name() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let fetcher = fetcher_for(&server);
        fetcher.refetch().await;
        fetcher.set_name(None).await;
        fetcher.set_name(Some("")).await;
        mock.assert_async().await;
        assert_eq!(fetcher.snapshot(), DetailState::Idle);
    }

    #[tokio::test]
    async fn clearing_name_discards_in_flight_result() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/pokemon/pikachu")
            .with_status(200)
            .with_body(PIKACHU)
            .create_async()
            .await;

        let fetcher = fetcher_for(&server);
        let pending = fetcher.set_name(Some("pikachu"));
        assert!(fetcher.snapshot().loading());
        fetcher.set_name(None).await;
        pending.await;
        assert_eq!(fetcher.snapshot(), DetailState::Idle);
    }
}
