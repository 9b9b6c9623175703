//! Catalog and personalized recommendation flows.
//!
//! Both flows read an immutable store snapshot, run the pure
//! extract/score/group/rank pipeline over it, and hand a serializable result
//! back to the handler. Nothing here holds state across requests.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::pokemon_repo,
    error::AppResult,
    models::{ScoredPokemon, TagCategory},
};

use super::{grouping, ranking, scoring, tags};

/// How many scored candidates nominate chains for the personalized feed.
const TOP_CANDIDATES: usize = 20;

/// Default listing size when the user has no likes to learn from.
const DEFAULT_FEED_SIZE: i64 = 10;

/// Catalog recommendation result: ranked groups plus the pagination envelope.
#[derive(Debug, Serialize)]
pub struct CatalogPage {
    pub pokemon_groups: Vec<Vec<ScoredPokemon>>,
    pub total_items: usize,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: usize,
}

/// Personalized recommendation result. Unpaginated: the top-candidate cutoff
/// already bounds the group count.
#[derive(Debug, Serialize)]
pub struct PersonalizedFeed {
    pub pokemon_groups: Vec<Vec<ScoredPokemon>>,
    pub recommendation_type: &'static str,
}

/// Catalog mode: filter, expand to whole evolution lines, group, rank by
/// lowest catalog id, paginate.
pub async fn catalog(
    pool: &SqlitePool,
    filters: &HashMap<TagCategory, Vec<String>>,
    search: &str,
    page: u32,
    per_page: u32,
) -> AppResult<CatalogPage> {
    let matched = pokemon_repo::filter_catalog(pool, filters, search).await?;

    let chain_ids: HashSet<i64> = matched
        .iter()
        .filter_map(|pokemon| pokemon.evolution_chain_id)
        .collect();
    let standalone_row_ids: HashSet<i64> = matched
        .iter()
        .filter(|pokemon| pokemon.evolution_chain_id.is_none())
        .map(|pokemon| pokemon.id)
        .collect();
    let candidates = pokemon_repo::expand_selection(pool, &chain_ids, &standalone_row_ids).await?;

    tracing::debug!(
        matched = matched.len(),
        expanded = candidates.len(),
        "catalog selection"
    );

    let members: Vec<ScoredPokemon> = candidates.into_iter().map(ScoredPokemon::unscored).collect();
    let groups = grouping::group_by_chain(members);
    let ranked = ranking::rank_by_lowest_id(groups);
    let page_data = ranking::paginate(ranked, page, per_page);

    Ok(CatalogPage {
        pokemon_groups: page_data.groups,
        total_items: page_data.total_items,
        page,
        per_page,
        total_pages: page_data.total_pages,
    })
}

/// Personalized mode: profile from likes, score everything not yet liked,
/// let the top candidates nominate chains, expand, group, rank by best score.
pub async fn personalized(pool: &SqlitePool, liked_ids: &[i64]) -> AppResult<PersonalizedFeed> {
    if liked_ids.is_empty() {
        // Insufficient signal: one flat batch of the first records in store
        // order, unscored and unranked.
        let defaults = pokemon_repo::first_n(pool, DEFAULT_FEED_SIZE).await?;
        let batch: Vec<ScoredPokemon> = defaults.into_iter().map(ScoredPokemon::unscored).collect();
        let pokemon_groups = if batch.is_empty() { Vec::new() } else { vec![batch] };
        return Ok(PersonalizedFeed {
            pokemon_groups,
            recommendation_type: "personalized",
        });
    }

    let liked_set: HashSet<i64> = liked_ids.iter().copied().collect();
    let liked_records = pokemon_repo::by_pokemon_ids(pool, liked_ids).await?;
    let profile = tags::build_profile(&liked_records);

    let all = pokemon_repo::list_all(pool).await?;
    let mut scored = scoring::score_candidates(&all, &profile, &liked_set);
    scored.sort_by(|a, b| b.rank_score().cmp(&a.rank_score()));

    let top = &scored[..scored.len().min(TOP_CANDIDATES)];
    let chain_ids: HashSet<i64> = top
        .iter()
        .filter_map(|candidate| candidate.pokemon.evolution_chain_id)
        .collect();
    let standalone_row_ids: HashSet<i64> = top
        .iter()
        .filter(|candidate| candidate.pokemon.evolution_chain_id.is_none())
        .map(|candidate| candidate.pokemon.id)
        .collect();

    // Scores for every candidate, not just the nominating ones; expanded
    // chain members picked up below reuse them. Liked members stay unscored.
    let score_by_id: HashMap<i64, i64> = scored
        .iter()
        .map(|candidate| (candidate.pokemon.pokemon_id, candidate.rank_score()))
        .collect();

    let expanded = pokemon_repo::expand_selection(pool, &chain_ids, &standalone_row_ids).await?;
    let mut members: Vec<ScoredPokemon> = expanded
        .into_iter()
        .map(|pokemon| {
            let score = score_by_id.get(&pokemon.pokemon_id).copied();
            ScoredPokemon { pokemon, score }
        })
        .collect();
    members.sort_by(|a, b| b.rank_score().cmp(&a.rank_score()));

    tracing::debug!(
        profile_tags = profile.len(),
        candidates = scored.len(),
        result = members.len(),
        "personalized selection"
    );

    let groups = grouping::group_by_chain(members);
    let ranked = ranking::rank_by_top_score(groups);

    Ok(PersonalizedFeed {
        pokemon_groups: ranked.into_iter().map(|(_, members)| members).collect(),
        recommendation_type: "personalized",
    })
}
