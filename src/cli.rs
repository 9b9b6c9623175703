//! Command-line subcommands handled before server startup.

use sqlx::SqlitePool;

use crate::{
    auth::password,
    config::Config,
    db::user_repo,
    services::importer::{self, PokeApiProvider},
};

/// Handles a CLI subcommand if one was given.
///
/// Returns true when a command ran and the process should exit instead of
/// serving.
pub async fn handle_cli_commands(config: &Config, pool: &SqlitePool) -> anyhow::Result<bool> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("import") => {
            let path = args.next().unwrap_or_else(|| config.import_csv.clone());
            tracing::info!(%path, "importing pokemon data");
            let provider = PokeApiProvider::new(config.pokeapi_url.clone());
            let summary =
                importer::import_csv(pool, &provider, std::path::Path::new(&path)).await?;
            println!(
                "{} rows processed, {} inserted, {} skipped",
                summary.rows, summary.inserted, summary.skipped
            );
            Ok(true)
        }
        Some("create-admin") => {
            let hash = password::hash_password("admin")?;
            user_repo::upsert_admin(pool, "admin", &hash).await?;
            println!("admin account ready (username: admin)");
            Ok(true)
        }
        Some(other) => anyhow::bail!("unknown command: {other}"),
        None => Ok(false),
    }
}
