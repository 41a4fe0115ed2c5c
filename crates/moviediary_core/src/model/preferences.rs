//! Genre preference CSV handling.
//!
//! # Responsibility
//! - Parse and render the per-user preference CSV (`"Action,Drama,Sci-Fi"`).
//! - Map the CSV onto the profile editor's fixed genre choices.
//!
//! # Invariants
//! - Parsed tags are trimmed, non-empty and unique (case-insensitive),
//!   keeping first-seen order. Order is the ranking priority.

use serde::{Deserialize, Serialize};

/// Genres offered by the profile editor, in display order.
pub const KNOWN_GENRES: [&str; 7] = [
    "Action",
    "Drama",
    "Comedy",
    "Crime",
    "Romance",
    "Sci-Fi",
    "Adventure",
];

/// Ordered genre preferences of one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenrePreferences {
    tags: Vec<String>,
}

impl GenrePreferences {
    /// Parses a preference CSV. Blank input yields no tags.
    pub fn parse(csv: &str) -> Self {
        let mut tags: Vec<String> = Vec::new();
        for raw in csv.split(',') {
            let tag = raw.trim();
            if tag.is_empty() {
                continue;
            }
            if tags.iter().any(|seen| seen.eq_ignore_ascii_case(tag)) {
                continue;
            }
            tags.push(tag.to_string());
        }
        Self { tags }
    }

    /// Builds preferences from selected known genres, in canonical order.
    ///
    /// Unknown names are ignored; matching is case-insensitive and accepts
    /// `scifi` for `Sci-Fi`.
    pub fn from_selection<S: AsRef<str>>(selected: &[S]) -> Self {
        let tags = KNOWN_GENRES
            .iter()
            .filter(|known| {
                selected
                    .iter()
                    .any(|value| canonical_genre(value.as_ref()) == Some(**known))
            })
            .map(|known| (*known).to_string())
            .collect();
        Self { tags }
    }

    /// Renders the CSV stored in `users.preferences`.
    pub fn to_csv(&self) -> String {
        self.tags.join(",")
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether a known genre shows as selected in the profile editor.
    ///
    /// Mirrors the editor's loose matching: case-insensitive containment over
    /// the rendered CSV, with `scifi` accepted for `Sci-Fi`.
    pub fn selects(&self, genre: &str) -> bool {
        let haystack = self.to_csv().to_lowercase();
        let needle = genre.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        if needle == "sci-fi" && haystack.contains("scifi") {
            return true;
        }
        haystack.contains(needle.as_str())
    }

    /// Known genres currently selected, in editor order.
    pub fn selected_known_genres(&self) -> Vec<&'static str> {
        KNOWN_GENRES
            .iter()
            .copied()
            .filter(|genre| self.selects(genre))
            .collect()
    }
}

/// Known genre named by `name`, ignoring case; `scifi` maps to `Sci-Fi`.
pub fn canonical_genre(name: &str) -> Option<&'static str> {
    let name = name.trim();
    if name.eq_ignore_ascii_case("scifi") {
        return Some("Sci-Fi");
    }
    KNOWN_GENRES
        .iter()
        .copied()
        .find(|known| known.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::{canonical_genre, GenrePreferences};

    #[test]
    fn parse_trims_drops_blanks_and_dedupes() {
        let prefs = GenrePreferences::parse(" Drama, ,sci-fi,DRAMA,Sci-Fi ,Crime");
        assert_eq!(prefs.tags(), ["Drama", "sci-fi", "Crime"]);
        assert_eq!(prefs.to_csv(), "Drama,sci-fi,Crime");
    }

    #[test]
    fn parse_of_blank_csv_is_empty() {
        assert!(GenrePreferences::parse("   ").is_empty());
        assert!(GenrePreferences::parse("").is_empty());
    }

    #[test]
    fn from_selection_uses_canonical_order() {
        let prefs = GenrePreferences::from_selection(&["sci-fi", "Action", "Western"]);
        assert_eq!(prefs.to_csv(), "Action,Sci-Fi");
    }

    #[test]
    fn from_selection_accepts_scifi_alias() {
        let prefs = GenrePreferences::from_selection(&["Drama", "scifi"]);
        assert_eq!(prefs.to_csv(), "Drama,Sci-Fi");
        assert!(prefs.selects("Sci-Fi"));
        assert_eq!(canonical_genre(" SCIFI "), Some("Sci-Fi"));
        assert_eq!(canonical_genre("Western"), None);
    }

    #[test]
    fn selects_accepts_scifi_alias() {
        let prefs = GenrePreferences::parse("SciFi,drama");
        assert!(prefs.selects("Sci-Fi"));
        assert!(prefs.selects("Drama"));
        assert!(!prefs.selects("Comedy"));
        assert_eq!(prefs.selected_known_genres(), vec!["Drama", "Sci-Fi"]);
    }
}
