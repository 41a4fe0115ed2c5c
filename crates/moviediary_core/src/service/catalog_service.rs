//! Catalog use-case service: browsing, search and the home feed.

use crate::model::movie::{FeedItem, Movie, MovieId};
use crate::model::preferences::GenrePreferences;
use crate::model::user::UserId;
use crate::repo::movie_repo::MovieRepository;
use crate::repo::{RepoError, RepoResult};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for catalog lookups.
#[derive(Debug)]
pub enum CatalogServiceError {
    MovieNotFound(MovieId),
    Repo(RepoError),
}

impl Display for CatalogServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MovieNotFound(id) => write!(f, "movie not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::MovieNotFound(_) => None,
        }
    }
}

impl From<RepoError> for CatalogServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Catalog service facade over a movie repository.
pub struct CatalogService<R: MovieRepository> {
    repo: R,
}

impl<R: MovieRepository> CatalogService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Whole catalog, alphabetical.
    pub fn all_movies(&self) -> RepoResult<Vec<Movie>> {
        self.repo.list_movies()
    }

    /// One movie by id.
    pub fn movie(&self, movie_id: MovieId) -> Result<Movie, CatalogServiceError> {
        self.repo
            .get_movie(movie_id)?
            .ok_or(CatalogServiceError::MovieNotFound(movie_id))
    }

    /// Case-insensitive substring search over title, genre and description.
    pub fn search(&self, text: &str) -> RepoResult<Vec<Movie>> {
        let hits = self.repo.search_movies(text)?;
        debug!(
            "event=movie_search module=service status=ok query_len={} hit_count={}",
            text.trim().chars().count(),
            hits.len()
        );
        Ok(hits)
    }

    /// Movies tagged with `genre`. A blank genre lists the whole catalog.
    pub fn by_genre(&self, genre: &str) -> RepoResult<Vec<Movie>> {
        if genre.trim().is_empty() {
            return self.repo.list_movies();
        }
        self.repo.movies_by_genre(genre)
    }

    /// Home feed for an optional logged-in viewer.
    ///
    /// - Anonymous: plain catalog, no diary state.
    /// - Logged in: catalog with the viewer's diary state, re-ranked by
    ///   `preferences` when non-empty.
    pub fn home_feed(
        &self,
        viewer: Option<UserId>,
        preferences: &GenrePreferences,
    ) -> RepoResult<Vec<FeedItem>> {
        match viewer {
            None => Ok(self
                .repo
                .list_movies()?
                .into_iter()
                .map(FeedItem::plain)
                .collect()),
            Some(user_id) => self.repo.personalized_feed(user_id, preferences),
        }
    }
}
