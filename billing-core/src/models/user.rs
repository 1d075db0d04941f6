//! User account model.

use serde::{Deserialize, Serialize};

/// A back-office user account. Persisted inside the snapshot alongside the
/// business collections; the password field holds an argon2 hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "user".to_string()
}

/// Public projection of a user, safe to return over the API.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
        }
    }
}
