//! User repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist accounts and profile edits in the `users` table.
//! - Answer uniqueness questions for username/email.
//!
//! # Invariants
//! - `username` and `email` are unique; violations surface as
//!   `RepoError::Conflict`.
//! - Read models never include password hash or salt, except
//!   `find_credentials_by_email` which exists for login only.

use crate::model::user::{NewUserRecord, StoredCredentials, User, UserId};
use crate::repo::{ensure_connection_ready, map_write_error, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT
    id,
    username,
    email,
    COALESCE(preferences, '') AS preferences
FROM users";

/// Profile fields replaced by a profile edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    pub username: String,
    pub email: String,
    pub preferences: String,
}

/// Repository interface for account persistence.
pub trait UserRepository {
    /// Inserts a new account and returns its row id.
    fn create_user(&self, record: &NewUserRecord) -> RepoResult<UserId>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    /// Loads hash + salt for login verification.
    fn find_credentials_by_email(&self, email: &str) -> RepoResult<Option<StoredCredentials>>;
    /// Whether `username` is used by any account other than `excluding`.
    fn username_exists(&self, username: &str, excluding: Option<UserId>) -> RepoResult<bool>;
    /// Whether `email` is used by any account other than `excluding`.
    fn email_exists(&self, email: &str, excluding: Option<UserId>) -> RepoResult<bool>;
    /// Replaces username, email and preference CSV of one account.
    fn update_profile(&self, id: UserId, profile: &ProfileRecord) -> RepoResult<()>;
    /// Returns the stored preference CSV, or an empty string when unset or
    /// when the account does not exist.
    fn get_preferences(&self, id: UserId) -> RepoResult<String>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["users"])?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, record: &NewUserRecord) -> RepoResult<UserId> {
        self.conn
            .execute(
                "INSERT INTO users (
                    username,
                    email,
                    password_hash,
                    salt,
                    preferences
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    record.username.as_str(),
                    record.email.as_str(),
                    record.password_hash.as_str(),
                    record.salt.as_str(),
                    record.preferences.as_str(),
                ],
            )
            .map_err(map_write_error)?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE email = ?1;"),
                [email],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn find_credentials_by_email(&self, email: &str) -> RepoResult<Option<StoredCredentials>> {
        let credentials = self
            .conn
            .query_row(
                "SELECT
                    id,
                    username,
                    email,
                    COALESCE(preferences, '') AS preferences,
                    password_hash,
                    salt
                 FROM users
                 WHERE email = ?1;",
                [email],
                |row| {
                    Ok(StoredCredentials {
                        user: parse_user_row(row)?,
                        password_hash: row.get("password_hash")?,
                        salt: row.get("salt")?,
                    })
                },
            )
            .optional()?;
        Ok(credentials)
    }

    fn username_exists(&self, username: &str, excluding: Option<UserId>) -> RepoResult<bool> {
        exists_excluding(self.conn, "username", username, excluding)
    }

    fn email_exists(&self, email: &str, excluding: Option<UserId>) -> RepoResult<bool> {
        exists_excluding(self.conn, "email", email, excluding)
    }

    fn update_profile(&self, id: UserId, profile: &ProfileRecord) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE users
                 SET
                    username = ?2,
                    email = ?3,
                    preferences = ?4
                 WHERE id = ?1;",
                params![
                    id,
                    profile.username.as_str(),
                    profile.email.as_str(),
                    profile.preferences.as_str(),
                ],
            )
            .map_err(map_write_error)?;

        if changed == 0 {
            return Err(RepoError::UserNotFound(id));
        }

        Ok(())
    }

    fn get_preferences(&self, id: UserId) -> RepoResult<String> {
        let preferences = self
            .conn
            .query_row(
                "SELECT COALESCE(preferences, '') FROM users WHERE id = ?1;",
                [id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(preferences.unwrap_or_default())
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        email: row.get("email")?,
        preferences: row.get("preferences")?,
    })
}

fn exists_excluding(
    conn: &Connection,
    column: &'static str,
    value: &str,
    excluding: Option<UserId>,
) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!(
            "SELECT EXISTS(
                SELECT 1
                FROM users
                WHERE {column} = ?1
                  AND (?2 IS NULL OR id != ?2)
            );"
        ),
        params![value, excluding],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
