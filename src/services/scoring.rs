//! Similarity scoring of catalog records against a user profile.

use std::collections::HashSet;

use crate::models::{Pokemon, ScoredPokemon, TagCategory};

use super::tags::extract_tags;

/// Scores every candidate against the profile.
///
/// The score is the number of tags shared with the profile. Records the user
/// already likes are excluded entirely. Zero scores are kept; the top-N
/// cutoff is a ranking concern, not a scoring one. Input order is preserved.
pub fn score_candidates(
    all: &[Pokemon],
    profile: &HashSet<String>,
    liked_ids: &HashSet<i64>,
) -> Vec<ScoredPokemon> {
    all.iter()
        .filter(|pokemon| !liked_ids.contains(&pokemon.pokemon_id))
        .map(|pokemon| {
            let candidate_tags = extract_tags(pokemon, &TagCategory::ALL);
            let score = candidate_tags.intersection(profile).count() as i64;
            ScoredPokemon {
                pokemon: pokemon.clone(),
                score: Some(score),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pokemon_id: i64, type_tags: &str) -> Pokemon {
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
            role: String::new(),
            feature: String::new(),
            appearance: String::new(),
            national_id: None,
            image_url: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn test_score_is_overlap_cardinality() {
        let profile = HashSet::from(["fire".to_string(), "flying".to_string()]);
        let scored = score_candidates(
            &[record(1, "fire"), record(2, "fire, flying"), record(3, "water")],
            &profile,
            &HashSet::new(),
        );
        let scores: Vec<i64> = scored.iter().map(|s| s.score.unwrap()).collect();
        assert_eq!(scores, vec![1, 2, 0]);
    }

    #[test]
    fn test_liked_candidates_are_never_scored() {
        let profile = HashSet::from(["fire".to_string()]);
        let liked = HashSet::from([1]);
        let scored = score_candidates(&[record(1, "fire"), record(2, "fire")], &profile, &liked);
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].pokemon.pokemon_id, 2);
    }

    #[test]
    fn test_zero_scores_are_kept() {
        let profile = HashSet::from(["ghost".to_string()]);
        let scored = score_candidates(&[record(1, "fire")], &profile, &HashSet::new());
        assert_eq!(scored[0].score, Some(0));
    }
}
