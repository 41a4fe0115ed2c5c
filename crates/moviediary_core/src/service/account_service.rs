//! Account use-case service: registration, login and profile edits.
//!
//! # Responsibility
//! - Validate registration/profile input and enforce unique username/email.
//! - Salt and hash passwords before persistence; verify them at login.
//! - Normalize preference CSV through [`GenrePreferences`].
//!
//! # Invariants
//! - A rejected registration leaves the `users` table untouched.
//! - Inputs are trimmed before validation and storage.
//! - Log events carry ids and outcomes only, never names, emails or secrets.

use crate::model::preferences::GenrePreferences;
use crate::model::user::{NewUserRecord, User, UserId};
use crate::repo::user_repo::{ProfileRecord, UserRepository};
use crate::repo::{RepoError, RepoResult};
use crate::security::password::{generate_salt, hash_password, verify_password, PasswordError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for account use-cases.
#[derive(Debug)]
pub enum AccountServiceError {
    /// A required input was blank after trimming.
    MissingField(&'static str),
    UsernameTaken,
    EmailTaken,
    /// Unknown email or wrong password; callers cannot tell which.
    InvalidCredentials,
    UserNotFound(UserId),
    Password(PasswordError),
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for AccountServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::UsernameTaken => write!(f, "username already exists"),
            Self::EmailTaken => write!(f, "email already exists"),
            Self::InvalidCredentials => write!(f, "invalid email or password"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::Password(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent account state: {details}"),
        }
    }
}

impl Error for AccountServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Password(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AccountServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::UserNotFound(id) => Self::UserNotFound(id),
            RepoError::Conflict(message) if message.contains("users.username") => {
                Self::UsernameTaken
            }
            RepoError::Conflict(message) if message.contains("users.email") => Self::EmailTaken,
            other => Self::Repo(other),
        }
    }
}

impl From<PasswordError> for AccountServiceError {
    fn from(value: PasswordError) -> Self {
        Self::Password(value)
    }
}

/// Registration input as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Profile edit input. `preferences` is a CSV of genre tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
    pub preferences: String,
}

/// Account service facade over a user repository.
pub struct AccountService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> AccountService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new account with empty preferences.
    ///
    /// # Errors
    /// - `MissingField` when username, email or password is blank.
    /// - `UsernameTaken` / `EmailTaken` on duplicates (checked up front, and
    ///   again by the UNIQUE constraints).
    pub fn register(&self, request: &RegisterRequest) -> Result<User, AccountServiceError> {
        let username = required(&request.username, "username")?;
        let email = required(&request.email, "email")?;
        let password = required(&request.password, "password")?;

        if self.repo.username_exists(username, None)? {
            info!("event=user_register module=service status=rejected reason=username_taken");
            return Err(AccountServiceError::UsernameTaken);
        }
        if self.repo.email_exists(email, None)? {
            info!("event=user_register module=service status=rejected reason=email_taken");
            return Err(AccountServiceError::EmailTaken);
        }

        let salt = generate_salt();
        let password_hash = hash_password(password, &salt)?;
        let user_id = self.repo.create_user(&NewUserRecord {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            salt,
            preferences: String::new(),
        })?;

        info!("event=user_register module=service status=ok user_id={user_id}");
        self.repo
            .get_user(user_id)?
            .ok_or(AccountServiceError::InconsistentState(
                "registered user not found in read-back",
            ))
    }

    /// Verifies email + password and returns the matching account.
    pub fn login(&self, email: &str, password: &str) -> Result<User, AccountServiceError> {
        let email = required(email, "email")?;
        let password = required(password, "password")?;

        let Some(stored) = self.repo.find_credentials_by_email(email)? else {
            info!("event=user_login module=service status=rejected reason=unknown_email");
            return Err(AccountServiceError::InvalidCredentials);
        };

        if !verify_password(password, &stored.salt, &stored.password_hash)? {
            warn!(
                "event=user_login module=service status=rejected reason=bad_password user_id={}",
                stored.user.id
            );
            return Err(AccountServiceError::InvalidCredentials);
        }

        info!(
            "event=user_login module=service status=ok user_id={}",
            stored.user.id
        );
        Ok(stored.user)
    }

    /// Replaces username, email and preferences of one account.
    ///
    /// Uniqueness is checked against every other account, so keeping the
    /// current username/email is allowed.
    pub fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<User, AccountServiceError> {
        let username = required(&update.username, "username")?;
        let email = required(&update.email, "email")?;

        if self.repo.username_exists(username, Some(user_id))? {
            return Err(AccountServiceError::UsernameTaken);
        }
        if self.repo.email_exists(email, Some(user_id))? {
            return Err(AccountServiceError::EmailTaken);
        }

        let preferences = GenrePreferences::parse(&update.preferences);
        self.repo.update_profile(
            user_id,
            &ProfileRecord {
                username: username.to_string(),
                email: email.to_string(),
                preferences: preferences.to_csv(),
            },
        )?;

        info!(
            "event=profile_update module=service status=ok user_id={user_id} preference_count={}",
            preferences.len()
        );
        self.repo
            .get_user(user_id)?
            .ok_or(AccountServiceError::InconsistentState(
                "updated user not found in read-back",
            ))
    }

    /// Gets one account by id.
    pub fn get_user(&self, user_id: UserId) -> RepoResult<Option<User>> {
        self.repo.get_user(user_id)
    }

    /// Parsed genre preferences of one account (empty when unknown).
    pub fn preferences(&self, user_id: UserId) -> RepoResult<GenrePreferences> {
        let csv = self.repo.get_preferences(user_id)?;
        Ok(GenrePreferences::parse(&csv))
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, AccountServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AccountServiceError::MissingField(field));
    }
    Ok(trimmed)
}
