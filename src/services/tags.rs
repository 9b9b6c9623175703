//! Tag extraction and user profile aggregation.

use std::collections::HashSet;

use crate::models::{Pokemon, TagCategory};

/// Literal separator between tags in a stored attribute string.
pub const TAG_SEPARATOR: &str = ", ";

/// Tags of one record over the selected categories.
///
/// Tokens are taken verbatim (no trimming, no case folding), so "Fire" and
/// "fire" are distinct tags. Empty attributes contribute nothing.
pub fn extract_tags(pokemon: &Pokemon, categories: &[TagCategory]) -> HashSet<String> {
    let mut tags = HashSet::new();
    for &category in categories {
        let raw = pokemon.attribute(category);
        if raw.is_empty() {
            continue;
        }
        for token in raw.split(TAG_SEPARATOR) {
            tags.insert(token.to_string());
        }
    }
    tags
}

/// Profile tag-set of a user: the union of tags over the liked records.
///
/// An empty liked list yields the empty set; callers treat that as
/// "insufficient signal" and fall back to the default listing instead of
/// scoring against it.
pub fn build_profile(liked: &[Pokemon]) -> HashSet<String> {
    let mut profile = HashSet::new();
    for pokemon in liked {
        profile.extend(extract_tags(pokemon, &TagCategory::ALL));
    }
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pokemon_id: i64, type_tags: &str, role: &str) -> Pokemon {
        Pokemon {
            id: pokemon_id,
            pokemon_id,
            name_ko: format!("포켓몬{pokemon_id}"),
            name_en: String::new(),
            generation: String::new(),
            is_legendary: String::new(),
            is_mythical: String::new(),
            evolution_chain_id: None,
            type_tags: type_tags.to_string(),
            role: role.to_string(),
            feature: String::new(),
            appearance: String::new(),
            national_id: None,
            image_url: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn test_empty_attributes_contribute_nothing() {
        let tags = extract_tags(&record(1, "", ""), &TagCategory::ALL);
        assert!(tags.is_empty());
    }

    #[test]
    fn test_split_on_comma_space_only() {
        // "a,b" has no comma-space separator and stays a single token.
        let tags = extract_tags(&record(1, "fire,flying", ""), &[TagCategory::Type]);
        assert_eq!(tags, HashSet::from(["fire,flying".to_string()]));

        let tags = extract_tags(&record(1, "fire, flying", ""), &[TagCategory::Type]);
        assert_eq!(
            tags,
            HashSet::from(["fire".to_string(), "flying".to_string()])
        );
    }

    #[test]
    fn test_no_case_folding() {
        let tags = extract_tags(&record(1, "Fire, fire", ""), &[TagCategory::Type]);
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_union_across_categories_collapses_duplicates() {
        let tags = extract_tags(&record(1, "fast", "fast, tank"), &TagCategory::ALL);
        assert_eq!(tags, HashSet::from(["fast".to_string(), "tank".to_string()]));
    }

    #[test]
    fn test_profile_is_order_independent() {
        let a = record(1, "fire", "sweeper");
        let b = record(2, "water, flying", "");
        let forward = build_profile(&[a.clone(), b.clone()]);
        let reverse = build_profile(&[b, a]);
        assert_eq!(forward, reverse);
        assert_eq!(forward.len(), 4);
    }

    #[test]
    fn test_empty_likes_give_empty_profile() {
        assert!(build_profile(&[]).is_empty());
    }
}
