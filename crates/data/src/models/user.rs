//! User identity records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered wallet user.
///
/// Passwords are compared as stored (the original system never hashed them)
/// and are never serialized into API responses.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    /// Legacy password column, still honored at login.
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub is_verified: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Returns true if `candidate` matches either stored password field.
    #[must_use]
    pub fn matches_password(&self, candidate: &str) -> bool {
        self.password == candidate
            || self
                .password_hash
                .as_deref()
                .is_some_and(|stored| stored == candidate)
    }
}

/// Fields required to create a user. `is_verified` and `is_admin` always
/// start false; id and timestamp are server-assigned.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
}

/// Partial user update. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub is_verified: Option<bool>,
    pub is_admin: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_user() -> User {
        User {
            id: 1,
            username: "satoshi".to_string(),
            email: "satoshi@example.com".to_string(),
            password: "hunter2".to_string(),
            password_hash: Some("legacy-secret".to_string()),
            first_name: "Satoshi".to_string(),
            last_name: "Nakamoto".to_string(),
            address: None,
            is_verified: false,
            is_admin: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn matches_either_password_field() {
        let user = make_user();
        assert!(user.matches_password("hunter2"));
        assert!(user.matches_password("legacy-secret"));
        assert!(!user.matches_password("wrong"));
    }

    #[test]
    fn passwords_are_stripped_from_json() {
        let json = serde_json::to_value(make_user()).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["username"], "satoshi");
        assert_eq!(json["firstName"], "Satoshi");
    }
}
