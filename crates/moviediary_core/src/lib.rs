//! Core domain logic for MovieDiary.
//! This crate is the single source of truth for accounts, catalog and diary
//! invariants; front ends only call into `service`.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod security;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::diary::{DiaryEntry, DiaryStatus, Rating, RatingOutOfRange, MAX_RATING};
pub use model::movie::{FeedItem, Movie, MovieId};
pub use model::preferences::{canonical_genre, GenrePreferences, KNOWN_GENRES};
pub use model::user::{User, UserId};
pub use repo::diary_repo::{DiaryRepository, SqliteDiaryRepository};
pub use repo::movie_repo::{MovieRepository, SqliteMovieRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::account_service::{
    AccountService, AccountServiceError, ProfileUpdate, RegisterRequest,
};
pub use service::catalog_service::{CatalogService, CatalogServiceError};
pub use service::diary_service::{DiaryService, DiaryServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
