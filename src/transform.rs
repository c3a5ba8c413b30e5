use crate::models::{Pokemon, PokemonDetailResponse, Stats};

/// Map a raw detail record into the normalized [`Pokemon`].
///
/// Never fails: missing stats stay at 0, unknown stat names are skipped and an
/// absent artwork falls back to the default sprite (or an empty string).
pub fn transform_pokemon(data: &PokemonDetailResponse) -> Pokemon {
    let mut stats = Stats::default();
    for slot in &data.stats {
        if let Some(field) = stat_field(&mut stats, &slot.stat.name) {
            *field = slot.base_stat;
        }
    }

    Pokemon {
        id: data.id,
        name: data.name.clone(),
        image_url: image_url(data),
        types: data.types.iter().map(|t| t.kind.name.clone()).collect(),
        height: data.height,
        weight: data.weight,
        abilities: data.abilities.iter().map(|a| a.ability.name.clone()).collect(),
        stats,
    }
}

fn stat_field<'a>(stats: &'a mut Stats, name: &str) -> Option<&'a mut u32> {
    match name {
        "hp" => Some(&mut stats.hp),
        "attack" => Some(&mut stats.attack),
        "defense" => Some(&mut stats.defense),
        "special-attack" => Some(&mut stats.special_attack),
        "special-defense" => Some(&mut stats.special_defense),
        "speed" => Some(&mut stats.speed),
        _ => None,
    }
}

fn image_url(data: &PokemonDetailResponse) -> String {
    let non_empty = |s: &Option<String>| s.as_deref().filter(|u| !u.is_empty()).map(str::to_string);
    non_empty(&data.sprites.other.official_artwork.front_default)
        .or_else(|| non_empty(&data.sprites.front_default))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detail(value: serde_json::Value) -> PokemonDetailResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn copies_scalar_fields_and_flattens_lists() {
        let raw = detail(json!({
            "id": 1,
            "name": "bulbasaur",
            "height": 7,
            "weight": 69,
            "sprites": {
                "front_default": "front.png",
                "other": { "official-artwork": { "front_default": "art.png" } }
            },
            "types": [{ "slot": 1, "type": { "name": "grass" } }, { "slot": 2, "type": { "name": "poison" } }],
            "abilities": [{ "ability": { "name": "overgrow" } }, { "ability": { "name": "chlorophyll" } }],
            "stats": [
                { "stat": { "name": "hp" }, "base_stat": 45 },
                { "stat": { "name": "attack" }, "base_stat": 49 },
                { "stat": { "name": "defense" }, "base_stat": 49 },
                { "stat": { "name": "special-attack" }, "base_stat": 65 },
                { "stat": { "name": "special-defense" }, "base_stat": 65 },
                { "stat": { "name": "speed" }, "base_stat": 45 }
            ]
        }));

        let p = transform_pokemon(&raw);
        assert_eq!(p.id, 1);
        assert_eq!(p.name, "bulbasaur");
        assert_eq!((p.height, p.weight), (7, 69));
        assert_eq!(p.image_url, "art.png");
        assert_eq!(p.types, vec!["grass", "poison"]);
        assert_eq!(p.abilities, vec!["overgrow", "chlorophyll"]);
        assert_eq!(
            p.stats,
            Stats {
                hp: 45,
                attack: 49,
                defense: 49,
                special_attack: 65,
                special_defense: 65,
                speed: 45,
            }
        );
    }

    #[test]
    fn missing_and_unknown_stats_default_to_zero() {
        let raw = detail(json!({
            "id": 25,
            "name": "pikachu",
            "stats": [
                { "stat": { "name": "speed" }, "base_stat": 90 },
                { "stat": { "name": "accuracy" }, "base_stat": 100 }
            ]
        }));

        let p = transform_pokemon(&raw);
        assert_eq!(
            p.stats,
            Stats {
                speed: 90,
                ..Stats::default()
            }
        );
    }

    #[test]
    fn artwork_falls_back_to_front_sprite() {
        let raw = detail(json!({
            "sprites": {
                "front_default": "front.png",
                "other": { "official-artwork": { "front_default": "" } }
            }
        }));
        assert_eq!(transform_pokemon(&raw).image_url, "front.png");

        let raw = detail(json!({ "sprites": { "front_default": "front.png" } }));
        assert_eq!(transform_pokemon(&raw).image_url, "front.png");
    }

    #[test]
    fn no_sprites_gives_empty_image_url() {
        let raw = detail(json!({
            "sprites": { "front_default": null, "other": { "official-artwork": { "front_default": null } } }
        }));
        assert_eq!(transform_pokemon(&raw).image_url, "");
        assert_eq!(transform_pokemon(&PokemonDetailResponse::default()), Pokemon::default());
    }
}
