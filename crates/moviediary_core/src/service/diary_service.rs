//! Diary use-case service.
//!
//! # Responsibility
//! - Mark movies as wishlist/watched, rate watched movies, remove entries.
//! - Provide the detail-screen toggle semantics: pressing the active status
//!   removes the entry, pressing the other one replaces it.
//!
//! # Invariants
//! - Ratings are validated to `0..=5` before any write.
//! - Wishlist writes always store rating 0.
//! - Rating changes are only accepted for watched entries.

use crate::model::diary::{DiaryEntry, DiaryStatus, Rating, RatingOutOfRange};
use crate::model::movie::{FeedItem, MovieId};
use crate::model::user::UserId;
use crate::repo::diary_repo::DiaryRepository;
use crate::repo::{RepoError, RepoResult};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for diary use-cases.
#[derive(Debug)]
pub enum DiaryServiceError {
    InvalidRating(RatingOutOfRange),
    /// Rating change requested for a movie that is not marked watched.
    NotWatched(MovieId),
    EntryNotFound {
        user_id: UserId,
        movie_id: MovieId,
    },
    /// User or movie id does not exist.
    UnknownReference(String),
    Repo(RepoError),
}

impl Display for DiaryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRating(err) => write!(f, "{err}"),
            Self::NotWatched(movie_id) => {
                write!(f, "movie {movie_id} must be marked watched before rating")
            }
            Self::EntryNotFound { movie_id, .. } => {
                write!(f, "movie {movie_id} is not in the diary")
            }
            Self::UnknownReference(message) => write!(f, "unknown user or movie: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DiaryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidRating(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for DiaryServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::EntryNotFound { user_id, movie_id } => {
                Self::EntryNotFound { user_id, movie_id }
            }
            RepoError::MissingReference(message) => Self::UnknownReference(message),
            other => Self::Repo(other),
        }
    }
}

impl From<RatingOutOfRange> for DiaryServiceError {
    fn from(value: RatingOutOfRange) -> Self {
        Self::InvalidRating(value)
    }
}

/// Diary service facade over a diary repository.
pub struct DiaryService<R: DiaryRepository> {
    repo: R,
}

impl<R: DiaryRepository> DiaryService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Current diary state of one movie for one user.
    pub fn entry(&self, user_id: UserId, movie_id: MovieId) -> RepoResult<Option<DiaryEntry>> {
        self.repo.get_entry(user_id, movie_id)
    }

    /// Puts a movie on the wishlist, replacing any watched state.
    pub fn add_to_wishlist(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> Result<DiaryEntry, DiaryServiceError> {
        self.write(user_id, movie_id, DiaryEntry::wishlist())
    }

    /// Marks a movie watched with the given rating (0 = unrated).
    pub fn mark_watched(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        rating: u8,
    ) -> Result<DiaryEntry, DiaryServiceError> {
        let rating = Rating::new(rating)?;
        self.write(user_id, movie_id, DiaryEntry::watched(rating))
    }

    /// Changes the rating of a watched movie.
    ///
    /// # Errors
    /// - `NotWatched` when the movie is absent or on the wishlist.
    pub fn rate(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        rating: u8,
    ) -> Result<DiaryEntry, DiaryServiceError> {
        let rating = Rating::new(rating)?;
        match self.repo.get_entry(user_id, movie_id)? {
            Some(current) if current.status == DiaryStatus::Watched => {
                self.write(user_id, movie_id, DiaryEntry::watched(rating))
            }
            _ => Err(DiaryServiceError::NotWatched(movie_id)),
        }
    }

    /// Wishlist button: removes a wishlisted movie, otherwise wishlists it.
    ///
    /// Returns the resulting entry, `None` when the movie left the diary.
    pub fn toggle_wishlist(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> Result<Option<DiaryEntry>, DiaryServiceError> {
        match self.repo.get_entry(user_id, movie_id)? {
            Some(current) if current.status == DiaryStatus::Wishlist => {
                self.remove(user_id, movie_id)?;
                Ok(None)
            }
            _ => self.add_to_wishlist(user_id, movie_id).map(Some),
        }
    }

    /// Watched button: removes a watched movie, otherwise marks it watched
    /// with `rating`.
    pub fn toggle_watched(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        rating: u8,
    ) -> Result<Option<DiaryEntry>, DiaryServiceError> {
        match self.repo.get_entry(user_id, movie_id)? {
            Some(current) if current.status == DiaryStatus::Watched => {
                self.remove(user_id, movie_id)?;
                Ok(None)
            }
            _ => self.mark_watched(user_id, movie_id, rating).map(Some),
        }
    }

    /// Removes a movie from whichever list it is on.
    pub fn remove(&self, user_id: UserId, movie_id: MovieId) -> Result<(), DiaryServiceError> {
        self.repo.remove_entry(user_id, movie_id)?;
        info!(
            "event=diary_remove module=service status=ok user_id={user_id} movie_id={movie_id}"
        );
        Ok(())
    }

    /// Wishlisted movies, alphabetical.
    pub fn wishlist(&self, user_id: UserId) -> RepoResult<Vec<FeedItem>> {
        self.repo.list_entries(user_id, DiaryStatus::Wishlist)
    }

    /// Watched movies with ratings, alphabetical.
    pub fn watched(&self, user_id: UserId) -> RepoResult<Vec<FeedItem>> {
        self.repo.list_entries(user_id, DiaryStatus::Watched)
    }

    fn write(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        entry: DiaryEntry,
    ) -> Result<DiaryEntry, DiaryServiceError> {
        self.repo.upsert_entry(user_id, movie_id, &entry)?;
        info!(
            "event=diary_upsert module=service status=ok user_id={user_id} movie_id={movie_id} diary_status={} rating={}",
            entry.status,
            entry.rating.value()
        );
        Ok(entry)
    }
}
