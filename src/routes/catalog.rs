use std::collections::{BTreeMap, BTreeSet, HashMap};

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    auth::AuthUser,
    db::{pokemon_repo, user_repo},
    error::{AppError, AppResult},
    models::{Pokemon, TagCategory},
    services::{
        recommend::{catalog, personalized, CatalogPage, PersonalizedFeed},
        tags,
    },
    state::AppState,
};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PER_PAGE: u32 = 9;

/// All tags currently in the store, per category, for the filter UI.
pub async fn available_filters(
    State(state): State<AppState>,
) -> AppResult<Json<BTreeMap<TagCategory, Vec<String>>>> {
    let mut filters = BTreeMap::new();
    for category in TagCategory::ALL {
        let mut unique = BTreeSet::new();
        for raw in pokemon_repo::attribute_values(&state.pool, category).await? {
            for token in raw.split(tags::TAG_SEPARATOR) {
                if !token.is_empty() {
                    unique.insert(token.to_string());
                }
            }
        }
        filters.insert(category, unique.into_iter().collect());
    }
    Ok(Json(filters))
}

#[derive(Debug, Default, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub filters: HashMap<TagCategory, Vec<String>>,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub page: Option<Value>,
    #[serde(default)]
    pub per_page: Option<Value>,
}

/// Handler for the catalog recommendation endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> AppResult<Json<CatalogPage>> {
    let page = super::positive_or(request.page.as_ref(), DEFAULT_PAGE);
    let per_page = super::positive_or(request.per_page.as_ref(), DEFAULT_PER_PAGE);

    let result = catalog(
        &state.pool,
        &request.filters,
        &request.search,
        page,
        per_page,
    )
    .await?;
    Ok(Json(result))
}

/// Handler for the personalized recommendation endpoint
pub async fn recommend_personalized(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<PersonalizedFeed>> {
    let liked = user_repo::liked_ids(&state.pool, auth.user_id).await?;
    let feed = personalized(&state.pool, &liked).await?;
    Ok(Json(feed))
}

/// Single record lookup by catalog id
pub async fn pokemon_detail(
    State(state): State<AppState>,
    Path(pokemon_id): Path<i64>,
) -> AppResult<Json<Pokemon>> {
    pokemon_repo::find_by_pokemon_id(&state.pool, pokemon_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("pokemon not found".to_string()))
}
