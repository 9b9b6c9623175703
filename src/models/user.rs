use serde::{Deserialize, Serialize};

/// An account row. `password_hash` is an argon2 PHC string and never leaves
/// the server; API responses use [`UserInfo`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
}

/// Public view of a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub is_admin: bool,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin,
        }
    }
}

/// A "like" relation. At most one row exists per (user, pokemon) pair;
/// toggling deletes or recreates the row rather than duplicating it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserLike {
    pub id: i64,
    pub user_id: i64,
    pub pokemon_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_info_excludes_password_hash() {
        let user = User {
            id: 7,
            username: "misty".to_string(),
            password_hash: "$argon2id$...".to_string(),
            is_admin: false,
        };
        let info = UserInfo::from(&user);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["username"], "misty");
        assert!(json.get("password_hash").is_none());
    }
}
