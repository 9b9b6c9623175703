use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    auth::AuthUser, db::user_repo, error::AppResult, models::Pokemon, state::AppState,
};

const DEFAULT_DETAILS_PER_PAGE: u32 = 12;

/// Catalog ids the caller has liked
pub async fn liked_ids(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Value>> {
    let ids = user_repo::liked_ids(&state.pool, auth.user_id).await?;
    Ok(Json(json!({ "liked_pokemon_ids": ids })))
}

/// Flips the like state for one record and returns the updated id list
pub async fn toggle(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(pokemon_id): Path<i64>,
) -> AppResult<Json<Value>> {
    let status = user_repo::toggle_like(&state.pool, auth.user_id, pokemon_id).await?;
    let ids = user_repo::liked_ids(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, pokemon_id, status, "like toggled");
    Ok(Json(json!({ "status": status, "liked_pokemon_ids": ids })))
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailsQuery {
    page: Option<String>,
    per_page: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LikedDetails {
    pokemon: Vec<Pokemon>,
    total_items: i64,
    page: u32,
    per_page: u32,
    total_pages: i64,
}

/// Paginated full records of everything the caller has liked
pub async fn liked_details(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DetailsQuery>,
) -> AppResult<Json<LikedDetails>> {
    let page = super::parse_query_page(query.page.as_deref(), 1);
    let per_page = super::parse_query_page(query.per_page.as_deref(), DEFAULT_DETAILS_PER_PAGE);

    let (pokemon, total_items) =
        user_repo::liked_pokemon_page(&state.pool, auth.user_id, page, per_page).await?;
    let total_pages = (total_items + i64::from(per_page) - 1) / i64::from(per_page);

    Ok(Json(LikedDetails {
        pokemon,
        total_items,
        page,
        per_page,
        total_pages,
    }))
}
