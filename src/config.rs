/// Public PokeAPI endpoint.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Number of entries shown per browse page.
pub const POKEMON_PER_PAGE: u32 = 20;

/// Grid sprite location; `{id}` is replaced with the numeric Pokédex id.
pub const DEFAULT_SPRITE_URL_TEMPLATE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/{id}.png";

#[derive(Debug, Clone)]
pub struct DexConfig {
    pub base_url: String,
    pub page_size: u32,
    pub sprite_url_template: String,
}

impl Default for DexConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: POKEMON_PER_PAGE,
            sprite_url_template: DEFAULT_SPRITE_URL_TEMPLATE.to_string(),
        }
    }
}

impl DexConfig {
    /// Build a config pointing at `base_url`, keeping every other default.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn sprite_url(&self, id: u32) -> String {
        self.sprite_url_template.replace("{id}", &id.to_string())
    }

    pub fn total_pages(&self, total_count: u32) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        total_count.div_ceil(self.page_size)
    }
}
