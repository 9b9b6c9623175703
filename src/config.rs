use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// SQLite database connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Secret used to sign and verify access tokens
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// PokeAPI base URL (species lookups during import)
    #[serde(default = "default_pokeapi_url")]
    pub pokeapi_url: String,

    /// CSV file read by the `import` command
    #[serde(default = "default_import_csv")]
    pub import_csv: String,

    /// Directory with the built frontend, served as static files
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_database_url() -> String {
    "sqlite:pokemon_app.db".to_string()
}

fn default_jwt_secret() -> String {
    // Development-only default; deployments override via JWT_SECRET.
    "super-secret-key-change-it".to_string()
}

fn default_pokeapi_url() -> String {
    "https://pokeapi.co/api/v2".to_string()
}

fn default_import_csv() -> String {
    "pokemon_completed.csv".to_string()
}

fn default_static_dir() -> String {
    "frontend/build".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
