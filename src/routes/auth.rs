use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    auth::{password, AuthUser},
    db::user_repo,
    error::{AppError, AppResult},
    models::UserInfo,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> AppResult<(StatusCode, Json<Value>)> {
    if credentials.username.is_empty() || credentials.password.is_empty() {
        return Err(AppError::InvalidInput(
            "username and password are required".to_string(),
        ));
    }
    if user_repo::find_by_username(&state.pool, &credentials.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("username already taken".to_string()));
    }

    let hash = password::hash_password(&credentials.password)?;
    let user_id = user_repo::create_user(&state.pool, &credentials.username, &hash).await?;
    tracing::info!(user_id, username = %credentials.username, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "registration complete" })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> AppResult<Json<Value>> {
    let user = user_repo::find_by_username(&state.pool, &credentials.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid username or password".to_string()))?;
    password::verify_password(&credentials.password, &user.password_hash)?;

    let access_token = state.jwt.issue(user.id)?;
    Ok(Json(json!({ "access_token": access_token })))
}

pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<UserInfo>> {
    let user = user_repo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;
    Ok(Json(UserInfo::from(&user)))
}
