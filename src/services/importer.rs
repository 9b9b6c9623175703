//! CSV import with PokeAPI enrichment.
//!
//! Reads the completed catalog CSV and inserts rows that are not in the store
//! yet. Records with a national dex id get their sprite URL derived and their
//! Korean description (plus a missing evolution chain id) fetched from the
//! species endpoint; a failed lookup logs a warning and the row is imported
//! without a description.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{
    db::pokemon_repo,
    error::AppResult,
    models::pokemon::NewPokemon,
};

const SPRITE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

/// Species data fetched per record during import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeciesInfo {
    pub description_ko: String,
    pub evolution_chain_id: Option<i64>,
}

/// External species data source.
///
/// The import loop only needs one lookup per national id; keeping it behind a
/// trait lets tests run the loop without network access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeciesProvider: Send + Sync {
    async fn lookup(&self, national_id: i64) -> AppResult<SpeciesInfo>;
}

/// PokeAPI-backed species provider.
pub struct PokeApiProvider {
    http_client: reqwest::Client,
    api_url: String,
}

impl PokeApiProvider {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_url,
        }
    }
}

#[async_trait]
impl SpeciesProvider for PokeApiProvider {
    async fn lookup(&self, national_id: i64) -> AppResult<SpeciesInfo> {
        let url = format!("{}/pokemon-species/{}/", self.api_url, national_id);
        let species: ApiSpecies = self
            .http_client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let description_ko = species
            .flavor_text_entries
            .iter()
            .find(|entry| entry.language.name == "ko")
            .map(|entry| entry.flavor_text.replace('\n', " ").replace('\u{c}', " "))
            .unwrap_or_default();
        let evolution_chain_id = species
            .evolution_chain
            .as_ref()
            .and_then(|chain| chain_id_from_url(&chain.url));

        Ok(SpeciesInfo {
            description_ko,
            evolution_chain_id,
        })
    }
}

/// Raw species response, reduced to the fields the import needs.
#[derive(Debug, Deserialize)]
struct ApiSpecies {
    #[serde(default)]
    flavor_text_entries: Vec<ApiFlavorText>,
    #[serde(default)]
    evolution_chain: Option<ApiEvolutionChain>,
}

#[derive(Debug, Deserialize)]
struct ApiFlavorText {
    flavor_text: String,
    language: ApiLanguage,
}

#[derive(Debug, Deserialize)]
struct ApiLanguage {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiEvolutionChain {
    url: String,
}

/// The chain id is the trailing path segment of the chain URL.
fn chain_id_from_url(url: &str) -> Option<i64> {
    url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}

/// One CSV row, all columns read as text. The source file was written by a
/// spreadsheet pipeline, so numeric columns may carry float formatting.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    pokemon_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    generation: String,
    #[serde(default)]
    is_legendary: String,
    #[serde(default)]
    is_mythical: String,
    #[serde(default)]
    evolution_chain_id: String,
    #[serde(default, rename = "type")]
    type_tags: String,
    #[serde(default)]
    role: String,
    #[serde(default)]
    feature: String,
    #[serde(default)]
    appearance: String,
    #[serde(default)]
    national_id: String,
}

fn parse_id(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().map(|value| value as i64))
}

/// Optional ids additionally treat 0 as absent, matching the source data
/// where empty cells were filled with 0.
fn parse_optional_id(raw: &str) -> Option<i64> {
    parse_id(raw).filter(|value| *value != 0)
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ImportSummary {
    pub rows: usize,
    pub inserted: usize,
    pub skipped: usize,
}

pub async fn import_csv(
    pool: &SqlitePool,
    provider: &dyn SpeciesProvider,
    path: &Path,
) -> AppResult<ImportSummary> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut summary = ImportSummary::default();

    for row in reader.deserialize::<CsvRow>() {
        let row = row?;
        summary.rows += 1;

        let Some(pokemon_id) = parse_id(&row.pokemon_id) else {
            summary.skipped += 1;
            continue;
        };
        if pokemon_repo::exists(pool, pokemon_id).await? {
            summary.skipped += 1;
            continue;
        }

        let national_id = parse_optional_id(&row.national_id);
        let mut evolution_chain_id = parse_optional_id(&row.evolution_chain_id);
        let mut image_url = String::new();
        let mut description = String::new();

        if let Some(national) = national_id {
            image_url = format!("{SPRITE_URL}/{national}.png");
            match provider.lookup(national).await {
                Ok(info) => {
                    description = info.description_ko;
                    if evolution_chain_id.is_none() {
                        evolution_chain_id = info.evolution_chain_id;
                    }
                }
                Err(error) => {
                    tracing::warn!(
                        national_id = national,
                        %error,
                        "species lookup failed; importing without description"
                    );
                }
            }
        }

        pokemon_repo::insert(
            pool,
            &NewPokemon {
                pokemon_id,
                name_ko: row.name.clone(),
                name_en: row.name,
                generation: row.generation,
                is_legendary: row.is_legendary,
                is_mythical: row.is_mythical,
                evolution_chain_id,
                type_tags: row.type_tags,
                role: row.role,
                feature: row.feature,
                appearance: row.appearance,
                national_id,
                image_url,
                description,
            },
        )
        .await?;
        summary.inserted += 1;
    }

    tracing::info!(
        rows = summary.rows,
        inserted = summary.inserted,
        skipped = summary.skipped,
        "pokemon import finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

    use super::*;
    use crate::db;

    async fn memory_pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        db::run_migrations(&pool).await.unwrap();
        pool
    }

    fn write_fixture(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("pokedex-{}-{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_chain_id_from_url() {
        assert_eq!(
            chain_id_from_url("https://pokeapi.co/api/v2/evolution-chain/10/"),
            Some(10)
        );
        assert_eq!(chain_id_from_url("not-a-url"), None);
    }

    #[test]
    fn test_id_parsing_accepts_float_formatting() {
        assert_eq!(parse_id("25"), Some(25));
        assert_eq!(parse_id("25.0"), Some(25));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_optional_id("0"), None);
        assert_eq!(parse_optional_id("0.0"), None);
    }

    #[tokio::test]
    async fn test_import_inserts_new_rows_and_skips_existing() {
        let pool = memory_pool().await;
        let csv = "pokemon_id,name,generation,is_legendary,is_mythical,evolution_chain_id,type,role,feature,appearance,national_id\n\
                   1,이상해씨,1,,,1,\"풀, 독\",탱커,,씨앗,1\n\
                   bad,무시됨,1,,,,,,,,\n\
                   2,이상해풀,1,,,1,\"풀, 독\",탱커,,씨앗,2\n";
        let path = write_fixture("import.csv", csv);

        let mut provider = MockSpeciesProvider::new();
        provider.expect_lookup().returning(|id| {
            Ok(SpeciesInfo {
                description_ko: format!("도감 설명 {id}"),
                evolution_chain_id: Some(99),
            })
        });

        let summary = import_csv(&pool, &provider, &path).await.unwrap();
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.skipped, 1);

        let stored = pokemon_repo::find_by_pokemon_id(&pool, 1).await.unwrap().unwrap();
        assert_eq!(stored.type_tags, "풀, 독");
        assert_eq!(stored.description, "도감 설명 1");
        // CSV already carried a chain id; the provider's value is not used.
        assert_eq!(stored.evolution_chain_id, Some(1));
        assert!(stored.image_url.ends_with("/1.png"));

        // Re-running is a no-op for existing ids.
        let again = import_csv(&pool, &provider, &path).await.unwrap();
        assert_eq!(again.inserted, 0);
        assert_eq!(again.skipped, 3);

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_import_survives_lookup_failure() {
        let pool = memory_pool().await;
        let csv = "pokemon_id,name,generation,is_legendary,is_mythical,evolution_chain_id,type,role,feature,appearance,national_id\n\
                   7,꼬부기,1,,,,물,탱커,,거북,7\n";
        let path = write_fixture("import-fail.csv", csv);

        let mut provider = MockSpeciesProvider::new();
        provider
            .expect_lookup()
            .returning(|_| Err(crate::error::AppError::Internal("down".to_string())));

        let summary = import_csv(&pool, &provider, &path).await.unwrap();
        assert_eq!(summary.inserted, 1);

        let stored = pokemon_repo::find_by_pokemon_id(&pool, 7).await.unwrap().unwrap();
        assert_eq!(stored.description, "");
        assert_eq!(stored.evolution_chain_id, None);

        std::fs::remove_file(path).ok();
    }
}
