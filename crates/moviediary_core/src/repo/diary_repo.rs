//! Diary (`user_movies`) repository.
//!
//! # Responsibility
//! - Upsert, read and delete the single diary row of a (user, movie) pair.
//! - List a user's wishlist/watched movies with ratings.
//!
//! # Invariants
//! - At most one row per (user, movie): writes go through
//!   `ON CONFLICT(user_id, movie_id) DO UPDATE`.
//! - Wishlist rows are always written with rating 0.
//! - Deletes are scoped to exactly one (user, movie) pair.

use crate::model::diary::{DiaryEntry, DiaryStatus};
use crate::model::movie::{FeedItem, MovieId};
use crate::model::user::UserId;
use crate::repo::movie_repo::{parse_feed_row, parse_rating};
use crate::repo::{ensure_connection_ready, map_write_error, RepoError, RepoResult};
use rusqlite::{params, Connection};

/// Repository interface for diary rows.
pub trait DiaryRepository {
    /// Creates or replaces the entry for one (user, movie) pair.
    fn upsert_entry(&self, user_id: UserId, movie_id: MovieId, entry: &DiaryEntry)
        -> RepoResult<()>;
    fn get_entry(&self, user_id: UserId, movie_id: MovieId) -> RepoResult<Option<DiaryEntry>>;
    /// Deletes the entry, failing with `EntryNotFound` when absent.
    fn remove_entry(&self, user_id: UserId, movie_id: MovieId) -> RepoResult<()>;
    /// Movies in one list of the user, alphabetical, with stored ratings.
    fn list_entries(&self, user_id: UserId, status: DiaryStatus) -> RepoResult<Vec<FeedItem>>;
}

/// SQLite-backed diary repository.
pub struct SqliteDiaryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDiaryRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["users", "movies", "user_movies"])?;
        Ok(Self { conn })
    }
}

impl DiaryRepository for SqliteDiaryRepository<'_> {
    fn upsert_entry(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        entry: &DiaryEntry,
    ) -> RepoResult<()> {
        let entry = DiaryEntry::new(entry.status, entry.rating);

        self.conn
            .execute(
                "INSERT INTO user_movies (user_id, movie_id, status, rating)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (user_id, movie_id) DO UPDATE SET
                    status = excluded.status,
                    rating = excluded.rating;",
                params![
                    user_id,
                    movie_id,
                    entry.status.as_str(),
                    entry.rating.value()
                ],
            )
            .map_err(map_write_error)?;

        Ok(())
    }

    fn get_entry(&self, user_id: UserId, movie_id: MovieId) -> RepoResult<Option<DiaryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT status, rating
             FROM user_movies
             WHERE user_id = ?1 AND movie_id = ?2;",
        )?;
        let mut rows = stmt.query(params![user_id, movie_id])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let status_text: String = row.get("status")?;
        let status = DiaryStatus::parse(&status_text).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid status `{status_text}` in user_movies.status"
            ))
        })?;
        let rating = parse_rating(row.get("rating")?)?;

        Ok(Some(DiaryEntry { status, rating }))
    }

    fn remove_entry(&self, user_id: UserId, movie_id: MovieId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM user_movies WHERE user_id = ?1 AND movie_id = ?2;",
            params![user_id, movie_id],
        )?;

        if changed == 0 {
            return Err(RepoError::EntryNotFound { user_id, movie_id });
        }

        Ok(())
    }

    fn list_entries(&self, user_id: UserId, status: DiaryStatus) -> RepoResult<Vec<FeedItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                m.id AS id,
                m.title AS title,
                m.poster_url AS poster_url,
                m.description AS description,
                m.release_year AS release_year,
                m.genre AS genre,
                um.status AS user_status,
                um.rating AS user_rating
             FROM movies m
             JOIN user_movies um ON m.id = um.movie_id
             WHERE um.user_id = ?1
               AND um.status = ?2
             ORDER BY m.title ASC, m.id ASC;",
        )?;
        let mut rows = stmt.query(params![user_id, status.as_str()])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_feed_row(row)?);
        }
        Ok(items)
    }
}
