//! Diary entry model.
//!
//! # Invariants
//! - `rating` is always within `0..=5`.
//! - A `Wishlist` entry always carries rating `0`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Highest rating a watched movie can receive.
pub const MAX_RATING: u8 = 5;

/// Relationship of a user to one movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiaryStatus {
    /// Wants to watch; rating is not meaningful.
    Wishlist,
    /// Already watched; may carry a 0-5 rating.
    Watched,
}

impl DiaryStatus {
    /// Storage/display token (`WISHLIST` / `WATCHED`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wishlist => "WISHLIST",
            Self::Watched => "WATCHED",
        }
    }

    /// Parses the storage token. Matching is exact, as written by this crate.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "WISHLIST" => Some(Self::Wishlist),
            "WATCHED" => Some(Self::Watched),
            _ => None,
        }
    }
}

impl Display for DiaryStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Star rating in `0..=5`. Zero means "not rated".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const UNRATED: Self = Self(0);

    /// Validates a raw star count.
    pub fn new(value: u8) -> Result<Self, RatingOutOfRange> {
        if value > MAX_RATING {
            return Err(RatingOutOfRange(i64::from(value)));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| RatingOutOfRange(value))
            .and_then(Self::new)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

/// Raised when a rating falls outside `0..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingOutOfRange(pub i64);

impl Display for RatingOutOfRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "rating {} is outside 0..={MAX_RATING}", self.0)
    }
}

impl Error for RatingOutOfRange {}

/// Persisted diary state for one (user, movie) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub status: DiaryStatus,
    pub rating: Rating,
}

impl DiaryEntry {
    /// Builds an entry, resetting the rating when the status is wishlist.
    pub fn new(status: DiaryStatus, rating: Rating) -> Self {
        let rating = match status {
            DiaryStatus::Wishlist => Rating::UNRATED,
            DiaryStatus::Watched => rating,
        };
        Self { status, rating }
    }

    pub fn wishlist() -> Self {
        Self::new(DiaryStatus::Wishlist, Rating::UNRATED)
    }

    pub fn watched(rating: Rating) -> Self {
        Self::new(DiaryStatus::Watched, rating)
    }
}

#[cfg(test)]
mod tests {
    use super::{DiaryEntry, DiaryStatus, Rating};

    #[test]
    fn wishlist_entry_forces_rating_to_zero() {
        let entry = DiaryEntry::new(DiaryStatus::Wishlist, Rating::new(4).unwrap());
        assert_eq!(entry.rating, Rating::UNRATED);
    }

    #[test]
    fn watched_entry_keeps_rating() {
        let entry = DiaryEntry::watched(Rating::new(5).unwrap());
        assert_eq!(entry.rating.value(), 5);
    }

    #[test]
    fn rating_rejects_values_above_five() {
        assert!(Rating::new(6).is_err());
        assert!(Rating::try_from(-1_i64).is_err());
        assert_eq!(Rating::try_from(3_i64).unwrap().value(), 3);
    }

    #[test]
    fn status_tokens_are_stable() {
        for status in [DiaryStatus::Wishlist, DiaryStatus::Watched] {
            assert_eq!(DiaryStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(DiaryStatus::parse("watched"), None);
    }
}
