use std::sync::Arc;

use sqlx::SqlitePool;

use crate::{auth::jwt::JwtKeys, config::Config};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt: Arc<JwtKeys>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        Self {
            pool,
            jwt: Arc::new(JwtKeys::new(&config.jwt_secret)),
            config: Arc::new(config),
        }
    }
}
