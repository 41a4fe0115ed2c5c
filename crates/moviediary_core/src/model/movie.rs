//! Catalog movie model and feed projections.

use crate::model::diary::{DiaryStatus, Rating};
use serde::{Deserialize, Serialize};

/// SQLite row id of a `movies` record.
pub type MovieId = i64;

/// Catalog entry. `genre` is free text such as `"Sci-Fi, Action"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub poster_url: Option<String>,
    pub description: Option<String>,
    pub release_year: Option<i32>,
    pub genre: Option<String>,
}

impl Movie {
    /// Genre text for display, empty when unset.
    pub fn genre_text(&self) -> &str {
        self.genre.as_deref().unwrap_or("")
    }
}

/// One row of the home feed or a diary list: a movie plus the viewer's
/// diary state for it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub movie: Movie,
    pub status: Option<DiaryStatus>,
    pub rating: Option<Rating>,
}

impl FeedItem {
    /// Wraps a movie without any diary state (anonymous browsing).
    pub fn plain(movie: Movie) -> Self {
        Self {
            movie,
            status: None,
            rating: None,
        }
    }
}
