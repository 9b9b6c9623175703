//! Group-level ranking policies and pagination.

use std::cmp::Reverse;

use crate::models::ScoredPokemon;

use super::grouping::Group;

/// One page of ranked groups plus the pagination envelope numbers.
#[derive(Debug)]
pub struct GroupPage {
    pub groups: Vec<Vec<ScoredPokemon>>,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Catalog ordering: ascending by the lowest catalog id in each group.
pub fn rank_by_lowest_id(mut groups: Vec<Group>) -> Vec<Group> {
    groups.sort_by_key(|(_, members)| {
        members
            .iter()
            .map(|member| member.pokemon.pokemon_id)
            .min()
            .unwrap_or(i64::MAX)
    });
    groups
}

/// Personalized ordering: descending by the best member score in each group,
/// with unscored members counting as -1 so unscored groups sink to the
/// bottom. The sort is stable, so equal-scored groups keep their encounter
/// order.
pub fn rank_by_top_score(mut groups: Vec<Group>) -> Vec<Group> {
    groups.sort_by_key(|(_, members)| {
        Reverse(
            members
                .iter()
                .map(ScoredPokemon::rank_score)
                .max()
                .unwrap_or(-1),
        )
    });
    groups
}

/// Slices the ranked group list at `[(page-1)*per_page, page*per_page)`.
/// An out-of-range page yields an empty page with the totals intact.
pub fn paginate(groups: Vec<Group>, page: u32, per_page: u32) -> GroupPage {
    let total_items = groups.len();
    let per_page = per_page.max(1) as usize;
    let total_pages = total_items.div_ceil(per_page);
    let start = (page.max(1) as usize - 1).saturating_mul(per_page);

    let page_groups = groups
        .into_iter()
        .skip(start)
        .take(per_page)
        .map(|(_, members)| members)
        .collect();

    GroupPage {
        groups: page_groups,
        total_items,
        total_pages,
    }
}
