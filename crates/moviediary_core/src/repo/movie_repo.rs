//! Movie catalog repository and feed queries.
//!
//! # Responsibility
//! - Read the seeded catalog (list, detail, search, genre filter).
//! - Build the home feed: catalog joined with one user's diary state,
//!   optionally re-ranked by genre preferences.
//!
//! # Invariants
//! - Plain listings are ordered by `title ASC, id ASC`.
//! - Preference ranking: a movie whose genre text contains the Nth
//!   preference (and no earlier one) gets priority N; unmatched movies sort
//!   after every matched one; ties fall back to `title ASC, id ASC`.
//! - Matching is a case-insensitive substring test (`LIKE`), with user text
//!   bound as parameters, never spliced into SQL.

use crate::model::diary::{DiaryStatus, Rating};
use crate::model::movie::{FeedItem, Movie, MovieId};
use crate::model::preferences::GenrePreferences;
use crate::model::user::UserId;
use crate::repo::{ensure_connection_ready, like_contains_pattern, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};

const MOVIE_COLUMNS_SQL: &str =
    "m.id AS id, m.title AS title, m.poster_url AS poster_url, m.description AS description, \
     m.release_year AS release_year, m.genre AS genre";

const FEED_SELECT_SQL: &str = "SELECT
    m.id AS id,
    m.title AS title,
    m.poster_url AS poster_url,
    m.description AS description,
    m.release_year AS release_year,
    m.genre AS genre,
    um.status AS user_status,
    um.rating AS user_rating
FROM movies m
LEFT JOIN user_movies um
    ON m.id = um.movie_id
   AND um.user_id = ?";

/// Repository interface for catalog reads.
pub trait MovieRepository {
    fn list_movies(&self) -> RepoResult<Vec<Movie>>;
    fn get_movie(&self, id: MovieId) -> RepoResult<Option<Movie>>;
    /// Substring search over title, genre and description.
    ///
    /// Blank text lists the whole catalog.
    fn search_movies(&self, text: &str) -> RepoResult<Vec<Movie>>;
    /// Movies whose genre text contains `genre`.
    fn movies_by_genre(&self, genre: &str) -> RepoResult<Vec<Movie>>;
    /// Whole catalog with `user_id`'s diary state, alphabetical.
    fn home_feed(&self, user_id: UserId) -> RepoResult<Vec<FeedItem>>;
    /// Whole catalog with diary state, re-ranked by preferences.
    ///
    /// Falls back to [`MovieRepository::home_feed`] for empty preferences.
    fn personalized_feed(
        &self,
        user_id: UserId,
        preferences: &GenrePreferences,
    ) -> RepoResult<Vec<FeedItem>>;
}

/// SQLite-backed catalog repository.
pub struct SqliteMovieRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMovieRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["movies", "user_movies"])?;
        Ok(Self { conn })
    }

    fn query_movies(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Movie>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut movies = Vec::new();
        while let Some(row) = rows.next()? {
            movies.push(parse_movie_row(row)?);
        }
        Ok(movies)
    }

    fn query_feed(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<FeedItem>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_feed_row(row)?);
        }
        Ok(items)
    }
}

impl MovieRepository for SqliteMovieRepository<'_> {
    fn list_movies(&self) -> RepoResult<Vec<Movie>> {
        self.query_movies(
            &format!("SELECT {MOVIE_COLUMNS_SQL} FROM movies m ORDER BY m.title ASC, m.id ASC;"),
            Vec::new(),
        )
    }

    fn get_movie(&self, id: MovieId) -> RepoResult<Option<Movie>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {MOVIE_COLUMNS_SQL} FROM movies m WHERE m.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_movie_row(row)?));
        }
        Ok(None)
    }

    fn search_movies(&self, text: &str) -> RepoResult<Vec<Movie>> {
        let pattern = like_contains_pattern(text.trim());
        self.query_movies(
            &format!(
                "SELECT {MOVIE_COLUMNS_SQL}
                 FROM movies m
                 WHERE m.title LIKE ?1 ESCAPE '\\'
                    OR m.genre LIKE ?1 ESCAPE '\\'
                    OR m.description LIKE ?1 ESCAPE '\\'
                 ORDER BY m.title ASC, m.id ASC;"
            ),
            vec![Value::Text(pattern)],
        )
    }

    fn movies_by_genre(&self, genre: &str) -> RepoResult<Vec<Movie>> {
        let pattern = like_contains_pattern(genre.trim());
        self.query_movies(
            &format!(
                "SELECT {MOVIE_COLUMNS_SQL}
                 FROM movies m
                 WHERE m.genre LIKE ?1 ESCAPE '\\'
                 ORDER BY m.title ASC, m.id ASC;"
            ),
            vec![Value::Text(pattern)],
        )
    }

    fn home_feed(&self, user_id: UserId) -> RepoResult<Vec<FeedItem>> {
        self.query_feed(
            &format!("{FEED_SELECT_SQL} ORDER BY m.title ASC, m.id ASC;"),
            vec![Value::Integer(user_id)],
        )
    }

    fn personalized_feed(
        &self,
        user_id: UserId,
        preferences: &GenrePreferences,
    ) -> RepoResult<Vec<FeedItem>> {
        if preferences.is_empty() {
            return self.home_feed(user_id);
        }

        let mut bind_values = vec![Value::Integer(user_id)];
        let (order_case, ranking_values) = preference_order_case(preferences);
        bind_values.extend(ranking_values);

        self.query_feed(
            &format!("{FEED_SELECT_SQL} ORDER BY {order_case}, m.title ASC, m.id ASC;"),
            bind_values,
        )
    }
}

/// Builds `CASE WHEN m.genre LIKE ? THEN ? ... ELSE ? END` plus its binds.
fn preference_order_case(preferences: &GenrePreferences) -> (String, Vec<Value>) {
    let mut sql = String::from("CASE");
    let mut bind_values = Vec::with_capacity(preferences.len() * 2 + 1);
    let mut priority: i64 = 0;

    for tag in preferences.tags() {
        priority += 1;
        sql.push_str(" WHEN m.genre LIKE ? ESCAPE '\\' THEN ?");
        bind_values.push(Value::Text(like_contains_pattern(tag)));
        bind_values.push(Value::Integer(priority));
    }

    sql.push_str(" ELSE ? END");
    bind_values.push(Value::Integer(priority + 1));
    (sql, bind_values)
}

pub(crate) fn parse_movie_row(row: &Row<'_>) -> RepoResult<Movie> {
    Ok(Movie {
        id: row.get("id")?,
        title: row.get("title")?,
        poster_url: row.get("poster_url")?,
        description: row.get("description")?,
        release_year: row.get("release_year")?,
        genre: row.get("genre")?,
    })
}

pub(crate) fn parse_feed_row(row: &Row<'_>) -> RepoResult<FeedItem> {
    let movie = parse_movie_row(row)?;

    let status = match row.get::<_, Option<String>>("user_status")? {
        Some(value) => Some(DiaryStatus::parse(&value).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid status `{value}` in user_movies.status"))
        })?),
        None => None,
    };

    let rating = match row.get::<_, Option<i64>>("user_rating")? {
        Some(value) => Some(parse_rating(value)?),
        None => None,
    };

    Ok(FeedItem {
        movie,
        status,
        rating,
    })
}

pub(crate) fn parse_rating(value: i64) -> RepoResult<Rating> {
    Rating::try_from(value).map_err(|err| {
        RepoError::InvalidData(format!("invalid rating in user_movies.rating: {err}"))
    })
}

#[cfg(test)]
mod tests {
    use super::preference_order_case;
    use crate::model::preferences::GenrePreferences;
    use rusqlite::types::Value;

    #[test]
    fn order_case_binds_each_preference_with_increasing_priority() {
        let prefs = GenrePreferences::parse("Drama,Sci-Fi");
        let (sql, binds) = preference_order_case(&prefs);
        assert_eq!(sql.matches("WHEN").count(), 2);
        assert!(sql.ends_with("ELSE ? END"));
        assert_eq!(
            binds,
            vec![
                Value::Text("%Drama%".to_string()),
                Value::Integer(1),
                Value::Text("%Sci-Fi%".to_string()),
                Value::Integer(2),
                Value::Integer(3),
            ]
        );
    }
}
