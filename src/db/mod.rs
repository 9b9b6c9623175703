pub mod pokemon_repo;
pub mod sqlite;
pub mod user_repo;

pub use sqlite::{create_pool, run_migrations};
