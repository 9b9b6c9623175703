//! Administrative endpoints. Every handler performs the admin capability
//! check explicitly before touching the store.

use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    auth::{require_admin, AuthUser},
    db::{pokemon_repo, user_repo},
    error::{AppError, AppResult},
    models::{pokemon::PokemonUpdate, Pokemon, UserInfo},
    state::AppState,
};

const DEFAULT_PER_PAGE: u32 = 10;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:user_id", get(user_details))
        .route("/pokemon", get(list_pokemon))
        .route("/pokemon/:id", put(update_pokemon).delete(delete_pokemon))
}

pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<UserInfo>>> {
    require_admin(&state, auth.user_id).await?;
    let users = user_repo::list_users(&state.pool).await?;
    Ok(Json(users.iter().map(UserInfo::from).collect()))
}

#[derive(Debug, Serialize)]
pub struct UserDetails {
    #[serde(flatten)]
    info: UserInfo,
    likes: Vec<Pokemon>,
}

pub async fn user_details(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
) -> AppResult<Json<UserDetails>> {
    require_admin(&state, auth.user_id).await?;
    let user = user_repo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;
    let likes = user_repo::liked_pokemon(&state.pool, user_id).await?;
    Ok(Json(UserDetails {
        info: UserInfo::from(&user),
        likes,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    page: Option<String>,
    per_page: Option<String>,
    #[serde(default)]
    search: String,
}

#[derive(Debug, Serialize)]
pub struct PokemonPage {
    pokemon: Vec<Pokemon>,
    total_items: i64,
    page: u32,
    per_page: u32,
    total_pages: i64,
}

pub async fn list_pokemon(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<PokemonPage>> {
    require_admin(&state, auth.user_id).await?;
    let page = super::parse_query_page(query.page.as_deref(), 1);
    let per_page = super::parse_query_page(query.per_page.as_deref(), DEFAULT_PER_PAGE);

    let (pokemon, total_items) =
        pokemon_repo::admin_page(&state.pool, &query.search, page, per_page).await?;
    let total_pages = (total_items + i64::from(per_page) - 1) / i64::from(per_page);

    Ok(Json(PokemonPage {
        pokemon,
        total_items,
        page,
        per_page,
        total_pages,
    }))
}

pub async fn update_pokemon(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(changes): Json<PokemonUpdate>,
) -> AppResult<Json<Pokemon>> {
    require_admin(&state, auth.user_id).await?;
    let updated = pokemon_repo::update_partial(&state.pool, id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("pokemon not found".to_string()))?;
    tracing::info!(id, "pokemon updated");
    Ok(Json(updated))
}

pub async fn delete_pokemon(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    require_admin(&state, auth.user_id).await?;
    if !pokemon_repo::delete(&state.pool, id).await? {
        return Err(AppError::NotFound("pokemon not found".to_string()));
    }
    tracing::info!(id, "pokemon deleted");
    Ok(Json(json!({ "msg": "pokemon deleted" })))
}
