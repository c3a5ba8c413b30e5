use serde::{Deserialize, Serialize};

/// Lightweight reference to one Pokémon as returned by the listing endpoint.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct ListItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Normalized, fully-detailed Pokémon.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    pub image_url: String,
    pub types: Vec<String>,
    pub height: u32,
    pub weight: u32,
    pub abilities: Vec<String>,
    pub stats: Stats,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

impl Stats {
    /// Display label and value for each stat, in Pokédex order.
    pub fn entries(&self) -> [(&'static str, u32); 6] {
        [
            ("HP", self.hp),
            ("Attack", self.attack),
            ("Defense", self.defense),
            ("Sp. Attack", self.special_attack),
            ("Sp. Defense", self.special_defense),
            ("Speed", self.speed),
        ]
    }
}

// Raw API records. Every field defaults so partial payloads still decode.

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PokemonListResponse {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub results: Vec<ListItem>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PokemonDetailResponse {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub stats: Vec<StatSlot>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: OtherSprites,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct OtherSprites {
    #[serde(default, rename = "official-artwork")]
    pub official_artwork: Artwork,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Artwork {
    #[serde(default)]
    pub front_default: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct NamedResource {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TypeSlot {
    #[serde(default, rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AbilitySlot {
    #[serde(default)]
    pub ability: NamedResource,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StatSlot {
    #[serde(default)]
    pub stat: NamedResource,
    #[serde(default)]
    pub base_stat: u32,
}
