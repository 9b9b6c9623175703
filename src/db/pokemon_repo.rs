//! Entity store boundary for Pokémon records.
//!
//! Every lookup returns an immutable snapshot; the recommendation core works
//! on the returned vectors and never holds a transaction open.

use std::collections::{HashMap, HashSet};

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::{
    error::AppResult,
    models::{
        pokemon::{NewPokemon, PokemonUpdate},
        Pokemon, TagCategory,
    },
};

const COLUMNS: &str = "id, pokemon_id, name_ko, name_en, generation, is_legendary, is_mythical, \
                       evolution_chain_id, type, role, feature, appearance, national_id, \
                       image_url, description";

/// Full store snapshot in row-id order.
pub async fn list_all(pool: &SqlitePool) -> AppResult<Vec<Pokemon>> {
    let sql = format!("SELECT {COLUMNS} FROM pokemon ORDER BY id");
    Ok(sqlx::query_as::<_, Pokemon>(&sql).fetch_all(pool).await?)
}

/// First `limit` records in store order; the default listing for users with
/// no likes yet.
pub async fn first_n(pool: &SqlitePool, limit: i64) -> AppResult<Vec<Pokemon>> {
    let sql = format!("SELECT {COLUMNS} FROM pokemon ORDER BY id LIMIT ?");
    Ok(sqlx::query_as::<_, Pokemon>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?)
}

pub async fn find_by_pokemon_id(pool: &SqlitePool, pokemon_id: i64) -> AppResult<Option<Pokemon>> {
    let sql = format!("SELECT {COLUMNS} FROM pokemon WHERE pokemon_id = ?");
    Ok(sqlx::query_as::<_, Pokemon>(&sql)
        .bind(pokemon_id)
        .fetch_optional(pool)
        .await?)
}

pub async fn find_by_row_id(pool: &SqlitePool, id: i64) -> AppResult<Option<Pokemon>> {
    let sql = format!("SELECT {COLUMNS} FROM pokemon WHERE id = ?");
    Ok(sqlx::query_as::<_, Pokemon>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

pub async fn by_pokemon_ids(pool: &SqlitePool, pokemon_ids: &[i64]) -> AppResult<Vec<Pokemon>> {
    if pokemon_ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb =
        QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM pokemon WHERE pokemon_id IN ("));
    let mut ids = qb.separated(", ");
    for id in pokemon_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(") ORDER BY id");
    Ok(qb.build_query_as::<Pokemon>().fetch_all(pool).await?)
}

/// Records matching a catalog filter request.
///
/// Each requested tag must appear in the raw attribute string as a substring
/// (`LIKE '%tag%'`, not exact token equality, so a tag can match inside a
/// longer token). The optional `search` further restricts by substring on the
/// Korean display name.
pub async fn filter_catalog(
    pool: &SqlitePool,
    filters: &HashMap<TagCategory, Vec<String>>,
    search: &str,
) -> AppResult<Vec<Pokemon>> {
    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM pokemon WHERE 1 = 1"));
    for category in TagCategory::ALL {
        if let Some(tags) = filters.get(&category) {
            for tag in tags {
                qb.push(" AND ")
                    .push(category.column())
                    .push(" LIKE ")
                    .push_bind(format!("%{tag}%"));
            }
        }
    }
    if !search.is_empty() {
        qb.push(" AND name_ko LIKE ").push_bind(format!("%{search}%"));
    }
    qb.push(" ORDER BY id");
    Ok(qb.build_query_as::<Pokemon>().fetch_all(pool).await?)
}

/// Expands a selection to whole evolution lines: every record whose chain id
/// is in `chain_ids`, plus the chain-less records whose internal row id is in
/// `row_ids`.
pub async fn expand_selection(
    pool: &SqlitePool,
    chain_ids: &HashSet<i64>,
    row_ids: &HashSet<i64>,
) -> AppResult<Vec<Pokemon>> {
    if chain_ids.is_empty() && row_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM pokemon WHERE "));
    if !chain_ids.is_empty() {
        qb.push("evolution_chain_id IN (");
        let mut ids = qb.separated(", ");
        for id in chain_ids {
            ids.push_bind(*id);
        }
        ids.push_unseparated(")");
    }
    if !row_ids.is_empty() {
        if !chain_ids.is_empty() {
            qb.push(" OR ");
        }
        qb.push("id IN (");
        let mut ids = qb.separated(", ");
        for id in row_ids {
            ids.push_bind(*id);
        }
        ids.push_unseparated(")");
    }
    qb.push(" ORDER BY id");
    Ok(qb.build_query_as::<Pokemon>().fetch_all(pool).await?)
}

/// Raw (unsplit) values of one tag column, empty strings excluded. The
/// `/api/filters` handler splits and dedups them.
pub async fn attribute_values(pool: &SqlitePool, category: TagCategory) -> AppResult<Vec<String>> {
    let sql = format!(
        "SELECT {col} FROM pokemon WHERE {col} != ''",
        col = category.column()
    );
    Ok(sqlx::query_scalar::<_, String>(&sql).fetch_all(pool).await?)
}

/// Paginated admin listing with optional name search. Returns the page and
/// the total matching count.
pub async fn admin_page(
    pool: &SqlitePool,
    search: &str,
    page: u32,
    per_page: u32,
) -> AppResult<(Vec<Pokemon>, i64)> {
    let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM pokemon WHERE 1 = 1");
    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM pokemon WHERE 1 = 1"));
    if !search.is_empty() {
        let pattern = format!("%{search}%");
        count_qb.push(" AND name_ko LIKE ").push_bind(pattern.clone());
        qb.push(" AND name_ko LIKE ").push_bind(pattern);
    }
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let offset = i64::from(page.saturating_sub(1)) * i64::from(per_page);
    qb.push(" ORDER BY id LIMIT ")
        .push_bind(i64::from(per_page))
        .push(" OFFSET ")
        .push_bind(offset);
    let rows = qb.build_query_as::<Pokemon>().fetch_all(pool).await?;
    Ok((rows, total))
}

pub async fn exists(pool: &SqlitePool, pokemon_id: i64) -> AppResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM pokemon WHERE pokemon_id = ?")
        .bind(pokemon_id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

pub async fn insert(pool: &SqlitePool, record: &NewPokemon) -> AppResult<i64> {
    let result = sqlx::query(
        "INSERT INTO pokemon (pokemon_id, name_ko, name_en, generation, is_legendary, \
         is_mythical, evolution_chain_id, type, role, feature, appearance, national_id, \
         image_url, description) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(record.pokemon_id)
    .bind(&record.name_ko)
    .bind(&record.name_en)
    .bind(&record.generation)
    .bind(&record.is_legendary)
    .bind(&record.is_mythical)
    .bind(record.evolution_chain_id)
    .bind(&record.type_tags)
    .bind(&record.role)
    .bind(&record.feature)
    .bind(&record.appearance)
    .bind(record.national_id)
    .bind(&record.image_url)
    .bind(&record.description)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Applies the provided fields to a record, leaving the rest untouched.
/// Returns the updated record, or `None` when the row id is unknown.
pub async fn update_partial(
    pool: &SqlitePool,
    id: i64,
    changes: &PokemonUpdate,
) -> AppResult<Option<Pokemon>> {
    if find_by_row_id(pool, id).await?.is_none() {
        return Ok(None);
    }

    let mut qb = QueryBuilder::<Sqlite>::new("UPDATE pokemon SET ");
    let mut touched = false;
    {
        let mut assignments = qb.separated(", ");
        macro_rules! assign {
            ($column:literal, $value:expr) => {
                if let Some(value) = $value {
                    assignments.push(concat!($column, " = "));
                    assignments.push_bind_unseparated(value.clone());
                    touched = true;
                }
            };
        }
        assign!("pokemon_id", &changes.pokemon_id);
        assign!("name_ko", &changes.name_ko);
        assign!("name_en", &changes.name_en);
        assign!("generation", &changes.generation);
        assign!("is_legendary", &changes.is_legendary);
        assign!("is_mythical", &changes.is_mythical);
        assign!("evolution_chain_id", &changes.evolution_chain_id);
        assign!("type", &changes.type_tags);
        assign!("role", &changes.role);
        assign!("feature", &changes.feature);
        assign!("appearance", &changes.appearance);
        assign!("national_id", &changes.national_id);
        assign!("image_url", &changes.image_url);
        assign!("description", &changes.description);
    }

    if touched {
        qb.push(" WHERE id = ").push_bind(id);
        qb.build().execute(pool).await?;
    }
    find_by_row_id(pool, id).await
}

/// Deletes a record by row id. Returns whether a row was removed.
pub async fn delete(pool: &SqlitePool, id: i64) -> AppResult<bool> {
    let result = sqlx::query("DELETE FROM pokemon WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
