pub mod extract;
pub mod jwt;
pub mod password;

pub use extract::AuthUser;

use crate::{
    db::user_repo,
    error::{AppError, AppResult},
    models::User,
    state::AppState,
};

/// Capability check for admin routes. Performed explicitly in the handler
/// layer; the recommendation core never sees roles.
pub async fn require_admin(state: &AppState, user_id: i64) -> AppResult<User> {
    match user_repo::find_by_id(&state.pool, user_id).await? {
        Some(user) if user.is_admin => Ok(user),
        _ => Err(AppError::Forbidden("admin privileges required".to_string())),
    }
}
