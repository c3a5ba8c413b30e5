use crate::config::DexConfig;
use crate::error::DexError;
use crate::models::{PokemonDetailResponse, PokemonListResponse};
use reqwest::{Client, Response, StatusCode};
use std::sync::Arc;

/// Thin client over the PokeAPI endpoints this app consumes.
///
/// Cheap to clone: the reqwest client and the config are both shared.
#[derive(Debug, Clone)]
pub struct PokeApi {
    client: Client,
    config: Arc<DexConfig>,
}

impl PokeApi {
    pub fn new(config: DexConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &DexConfig {
        &self.config
    }

    pub fn pokemon_url(&self, name_or_id: &str) -> String {
        format!("{}/pokemon/{}", self.config.base_url, name_or_id)
    }

    /// `GET {base}/pokemon?limit={limit}&offset={offset}`
    pub async fn list(&self, limit: u32, offset: u64) -> Result<PokemonListResponse, DexError> {
        let url = format!(
            "{}/pokemon?limit={}&offset={}",
            self.config.base_url, limit, offset
        );
        let res = self.get(&url).await?;
        Ok(res.json::<PokemonListResponse>().await?)
    }

    /// `GET {base}/pokemon/{name}` with the name lower-cased.
    ///
    /// A 404 is reported as [`DexError::NotFound`].
    pub async fn pokemon(&self, name: &str) -> Result<PokemonDetailResponse, DexError> {
        let url = self.pokemon_url(&name.to_lowercase());
        let res = self.get(&url).await?;
        Ok(res.json::<PokemonDetailResponse>().await?)
    }

    /// Raw bytes of an image resource (artwork or sprite).
    pub async fn image_bytes(&self, url: &str) -> Result<Vec<u8>, DexError> {
        let res = self.get(url).await?;
        Ok(res.bytes().await?.to_vec())
    }

    async fn get(&self, url: &str) -> Result<Response, DexError> {
        log::debug!("GET {}", url);
        let res = self.client.get(url).send().await?;
        let status = res.status();
        log::debug!("GET {} -> {}", url, status);
        if status == StatusCode::NOT_FOUND {
            return Err(DexError::NotFound);
        }
        if !status.is_success() {
            return Err(DexError::RequestFailed(status));
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn api_for(server: &mockito::ServerGuard) -> PokeApi {
        PokeApi::new(DexConfig::with_base_url(server.url()))
    }

    #[tokio::test]
    async fn list_sends_limit_and_offset() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/pokemon")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "20".into()),
                Matcher::UrlEncoded("offset".into(), "40".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"count": 3, "results": [{"name": "a", "url": "u/1/"}]}"#)
            .create_async()
            .await;

        let page = api_for(&server).list(20, 40).await.unwrap();
        mock.assert_async().await;
        assert_eq!(page.count, 3);
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].name, "a");
    }

    #[tokio::test]
    async fn pokemon_lowercases_the_name() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/pokemon/pikachu")
            .with_status(200)
            .with_body(r#"{"id": 25, "name": "pikachu"}"#)
            .create_async()
            .await;

        let raw = api_for(&server).pokemon("PikaChu").await.unwrap();
        mock.assert_async().await;
        assert_eq!(raw.id, 25);
    }

    #[tokio::test]
    async fn status_codes_map_to_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/pokemon/missingno")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/pokemon/broken")
            .with_status(503)
            .create_async()
            .await;

        let api = api_for(&server);
        assert!(matches!(api.pokemon("missingno").await, Err(DexError::NotFound)));
        match api.pokemon("broken").await {
            Err(DexError::RequestFailed(status)) => assert_eq!(status.as_u16(), 503),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
