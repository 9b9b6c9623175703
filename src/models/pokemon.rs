use serde::{Deserialize, Serialize};

/// The four tag-bearing attributes of a Pokémon.
///
/// This is the closed set of filter categories accepted by the catalog API;
/// each variant maps to one column of the `pokemon` table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
    Type,
    Role,
    Feature,
    Appearance,
}

impl TagCategory {
    pub const ALL: [TagCategory; 4] = [
        TagCategory::Type,
        TagCategory::Role,
        TagCategory::Feature,
        TagCategory::Appearance,
    ];

    /// Column name in the `pokemon` table.
    pub fn column(self) -> &'static str {
        match self {
            TagCategory::Type => "type",
            TagCategory::Role => "role",
            TagCategory::Feature => "feature",
            TagCategory::Appearance => "appearance",
        }
    }
}

/// A catalog entry as stored and served.
///
/// `pokemon_id` is the public catalog id (unique across the store); `id` is
/// the internal row id. The four tag attributes are comma-space-joined tag
/// strings, possibly empty. An absent `evolution_chain_id` means the entry has
/// no known lineage and is treated as standalone by the grouper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Pokemon {
    pub id: i64,
    pub pokemon_id: i64,
    pub name_ko: String,
    pub name_en: String,
    pub generation: String,
    pub is_legendary: String,
    pub is_mythical: String,
    pub evolution_chain_id: Option<i64>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub type_tags: String,
    pub role: String,
    pub feature: String,
    pub appearance: String,
    pub national_id: Option<i64>,
    pub image_url: String,
    pub description: String,
}

impl Pokemon {
    /// Raw attribute string for one tag category.
    pub fn attribute(&self, category: TagCategory) -> &str {
        match category {
            TagCategory::Type => &self.type_tags,
            TagCategory::Role => &self.role,
            TagCategory::Feature => &self.feature,
            TagCategory::Appearance => &self.appearance,
        }
    }
}

/// A record to insert, as produced by the CSV importer. Same shape as
/// [`Pokemon`] minus the internal row id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPokemon {
    pub pokemon_id: i64,
    pub name_ko: String,
    pub name_en: String,
    pub generation: String,
    pub is_legendary: String,
    pub is_mythical: String,
    pub evolution_chain_id: Option<i64>,
    pub type_tags: String,
    pub role: String,
    pub feature: String,
    pub appearance: String,
    pub national_id: Option<i64>,
    pub image_url: String,
    pub description: String,
}

/// A partial update from the admin API. Absent fields are left untouched;
/// the nullable ids distinguish "not provided" from an explicit null.
#[derive(Debug, Default, Deserialize)]
pub struct PokemonUpdate {
    pub pokemon_id: Option<i64>,
    pub name_ko: Option<String>,
    pub name_en: Option<String>,
    pub generation: Option<String>,
    pub is_legendary: Option<String>,
    pub is_mythical: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub evolution_chain_id: Option<Option<i64>>,
    #[serde(rename = "type")]
    pub type_tags: Option<String>,
    pub role: Option<String>,
    pub feature: Option<String>,
    pub appearance: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub national_id: Option<Option<i64>>,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

/// Maps a present-but-null JSON value to `Some(None)` so partial updates can
/// clear a nullable column.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// A Pokémon with an optional similarity score attached.
///
/// The score is the number of tags shared with a user profile. It is absent on
/// catalog listings and on chain members that were pulled in by expansion
/// without being scored themselves; ranking treats an absent score as -1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPokemon {
    #[serde(flatten)]
    pub pokemon: Pokemon,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
}

impl ScoredPokemon {
    pub fn unscored(pokemon: Pokemon) -> Self {
        Self {
            pokemon,
            score: None,
        }
    }

    /// Score used for ranking comparisons (-1 when unscored).
    pub fn rank_score(&self) -> i64 {
        self.score.unwrap_or(-1)
    }
}
