//! User account model.

use serde::{Deserialize, Serialize};

/// SQLite row id of a `users` record.
pub type UserId = i64;

/// Public view of an account. Password hash and salt stay in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// Raw preference CSV as stored (empty when never set).
    pub preferences: String,
}

/// Insert shape for a new account. Hashing happens before this is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub salt: String,
    pub preferences: String,
}

/// Stored credential material for one account, used only by login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: String,
    pub salt: String,
}
