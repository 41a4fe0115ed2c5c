//! Plain-text rendering of catalog and diary rows.

use moviediary_core::{DiaryStatus, FeedItem, Movie, Rating, MAX_RATING};

/// One catalog row: `  3  Inception (2010)  [Sci-Fi, Action]`.
pub fn movie_line(movie: &Movie) -> String {
    let mut line = format!("{:>3}  {}", movie.id, movie.title);
    if let Some(year) = movie.release_year {
        line.push_str(&format!(" ({year})"));
    }
    if !movie.genre_text().is_empty() {
        line.push_str(&format!("  [{}]", movie.genre_text()));
    }
    line
}

/// Catalog row followed by the viewer's diary state, when any.
pub fn feed_line(item: &FeedItem) -> String {
    let line = movie_line(&item.movie);
    match item.status {
        Some(status) => format!(
            "{line}  <{}>",
            diary_state(status, item.rating.unwrap_or_default())
        ),
        None => line,
    }
}

/// `wishlist`, `watched, unrated` or `watched, 4/5`.
pub fn diary_state(status: DiaryStatus, rating: Rating) -> String {
    match status {
        DiaryStatus::Wishlist => "wishlist".to_string(),
        DiaryStatus::Watched if rating == Rating::UNRATED => "watched, unrated".to_string(),
        DiaryStatus::Watched => format!("watched, {}/{MAX_RATING}", rating.value()),
    }
}

/// Multi-line detail view of one movie.
pub fn movie_details(movie: &Movie) -> String {
    let mut out = movie.title.clone();
    if let Some(year) = movie.release_year {
        out.push_str(&format!(" ({year})"));
    }
    if !movie.genre_text().is_empty() {
        out.push_str(&format!("\nGenre: {}", movie.genre_text()));
    }
    if let Some(description) = movie.description.as_deref() {
        out.push_str(&format!("\n\n{description}"));
    }
    if let Some(poster) = movie.poster_url.as_deref() {
        out.push_str(&format!("\n\nPoster: {poster}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{diary_state, feed_line, movie_details, movie_line};
    use moviediary_core::{DiaryStatus, FeedItem, Movie, Rating};

    fn inception() -> Movie {
        Movie {
            id: 1,
            title: "Inception".to_string(),
            poster_url: None,
            description: Some("A thief who steals corporate secrets.".to_string()),
            release_year: Some(2010),
            genre: Some("Sci-Fi, Action".to_string()),
        }
    }

    #[test]
    fn movie_line_skips_missing_fields() {
        assert_eq!(movie_line(&inception()), "  1  Inception (2010)  [Sci-Fi, Action]");

        let bare = Movie {
            release_year: None,
            genre: None,
            ..inception()
        };
        assert_eq!(movie_line(&bare), "  1  Inception");
    }

    #[test]
    fn feed_line_appends_diary_state() {
        assert!(!feed_line(&FeedItem::plain(inception())).contains('<'));

        let watched = FeedItem {
            movie: inception(),
            status: Some(DiaryStatus::Watched),
            rating: Some(Rating::new(4).unwrap()),
        };
        assert!(feed_line(&watched).ends_with("<watched, 4/5>"));
    }

    #[test]
    fn diary_state_distinguishes_unrated() {
        assert_eq!(diary_state(DiaryStatus::Wishlist, Rating::UNRATED), "wishlist");
        assert_eq!(
            diary_state(DiaryStatus::Watched, Rating::UNRATED),
            "watched, unrated"
        );
    }

    #[test]
    fn details_include_description_but_not_missing_poster() {
        let details = movie_details(&inception());
        assert!(details.starts_with("Inception (2010)\nGenre: Sci-Fi, Action"));
        assert!(details.contains("corporate secrets"));
        assert!(!details.contains("Poster:"));
    }
}
