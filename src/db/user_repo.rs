//! User accounts and "like" relations.

use sqlx::SqlitePool;

use crate::{
    error::AppResult,
    models::{Pokemon, User},
};

pub async fn create_user(pool: &SqlitePool, username: &str, password_hash: &str) -> AppResult<i64> {
    let result = sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
        .bind(username)
        .bind(password_hash)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

/// Creates the account or resets its password; either way the account ends up
/// with admin rights. Backs the `create-admin` command.
pub async fn upsert_admin(pool: &SqlitePool, username: &str, password_hash: &str) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO users (username, password_hash, is_admin) VALUES (?, ?, TRUE) \
         ON CONFLICT (username) DO UPDATE SET password_hash = excluded.password_hash, \
         is_admin = TRUE",
    )
    .bind(username)
    .bind(password_hash)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> AppResult<Option<User>> {
    Ok(sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, is_admin FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> AppResult<Option<User>> {
    Ok(sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, is_admin FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?)
}

pub async fn list_users(pool: &SqlitePool) -> AppResult<Vec<User>> {
    Ok(sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, is_admin FROM users ORDER BY id",
    )
    .fetch_all(pool)
    .await?)
}

/// Catalog ids of everything this user has liked, in like order.
pub async fn liked_ids(pool: &SqlitePool, user_id: i64) -> AppResult<Vec<i64>> {
    Ok(
        sqlx::query_scalar("SELECT pokemon_id FROM user_likes WHERE user_id = ? ORDER BY id")
            .bind(user_id)
            .fetch_all(pool)
            .await?,
    )
}

/// Flips the like state for one (user, pokemon) pair. Returns the resulting
/// state: "liked" or "unliked".
pub async fn toggle_like(
    pool: &SqlitePool,
    user_id: i64,
    pokemon_id: i64,
) -> AppResult<&'static str> {
    let existing: Option<i64> =
        sqlx::query_scalar("SELECT id FROM user_likes WHERE user_id = ? AND pokemon_id = ?")
            .bind(user_id)
            .bind(pokemon_id)
            .fetch_optional(pool)
            .await?;

    match existing {
        Some(id) => {
            sqlx::query("DELETE FROM user_likes WHERE id = ?")
                .bind(id)
                .execute(pool)
                .await?;
            Ok("unliked")
        }
        None => {
            sqlx::query("INSERT INTO user_likes (user_id, pokemon_id) VALUES (?, ?)")
                .bind(user_id)
                .bind(pokemon_id)
                .execute(pool)
                .await?;
            Ok("liked")
        }
    }
}

const POKEMON_COLUMNS: &str =
    "p.id, p.pokemon_id, p.name_ko, p.name_en, p.generation, p.is_legendary, p.is_mythical, \
     p.evolution_chain_id, p.type, p.role, p.feature, p.appearance, p.national_id, p.image_url, \
     p.description";

/// All liked records for a user, in store order.
pub async fn liked_pokemon(pool: &SqlitePool, user_id: i64) -> AppResult<Vec<Pokemon>> {
    let sql = format!(
        "SELECT {POKEMON_COLUMNS} FROM pokemon p \
         JOIN user_likes l ON l.pokemon_id = p.pokemon_id \
         WHERE l.user_id = ? ORDER BY p.id"
    );
    Ok(sqlx::query_as::<_, Pokemon>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?)
}

/// One page of liked records plus the total liked count.
pub async fn liked_pokemon_page(
    pool: &SqlitePool,
    user_id: i64,
    page: u32,
    per_page: u32,
) -> AppResult<(Vec<Pokemon>, i64)> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM pokemon p \
         JOIN user_likes l ON l.pokemon_id = p.pokemon_id WHERE l.user_id = ?",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let sql = format!(
        "SELECT {POKEMON_COLUMNS} FROM pokemon p \
         JOIN user_likes l ON l.pokemon_id = p.pokemon_id \
         WHERE l.user_id = ? ORDER BY p.id LIMIT ? OFFSET ?"
    );
    let offset = i64::from(page.saturating_sub(1)) * i64::from(per_page);
    let rows = sqlx::query_as::<_, Pokemon>(&sql)
        .bind(user_id)
        .bind(i64::from(per_page))
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok((rows, total))
}
