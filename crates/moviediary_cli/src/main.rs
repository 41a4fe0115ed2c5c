//! MovieDiary command line front end.
//!
//! # Responsibility
//! - Map each screen of the app onto a subcommand.
//! - Own the local session file and path configuration.
//! - Leave every rule (validation, ranking, diary invariants) to
//!   `moviediary_core`.

mod config;
mod render;
mod session;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use config::{default_data_dir, AppPaths};
use log::info;
use moviediary_core::db::open_db;
use moviediary_core::{
    canonical_genre, default_log_level, init_logging, AccountService, CatalogService, DiaryService,
    GenrePreferences, MovieId, ProfileUpdate, RegisterRequest, SqliteDiaryRepository,
    SqliteMovieRepository, SqliteUserRepository, KNOWN_GENRES,
};
use render::{diary_state, feed_line, movie_details, movie_line};
use rusqlite::Connection;
use session::{Session, SessionStore};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "moviediary")]
#[command(about = "MovieDiary - keep a wishlist and a rated diary of movies", long_about = None)]
#[command(version)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "MOVIEDIARY_DB_PATH")]
    db: Option<PathBuf>,
    /// Directory for rolling log files
    #[arg(long, global = true, env = "MOVIEDIARY_LOG_DIR")]
    log_dir: Option<PathBuf>,
    /// trace, debug, info, warn or error
    #[arg(long, global = true, env = "MOVIEDIARY_LOG_LEVEL")]
    log_level: Option<String>,
    /// Session file of the logged-in user
    #[arg(long, global = true, env = "MOVIEDIARY_SESSION_PATH")]
    session: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Log in with email and password
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// End the current session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Home feed, ranked by your preferred genres when logged in
    Feed,

    /// Search titles, genres and descriptions
    Search {
        /// Text to look for (empty lists everything)
        #[arg(default_value = "")]
        text: String,
    },

    /// List movies whose genre contains NAME
    Genre {
        name: String,
    },

    /// Show movie details
    Show {
        /// Movie ID
        id: MovieId,
    },

    /// Wishlist button: adds the movie, or removes it when already wishlisted
    Wishlist {
        /// Movie ID
        id: MovieId,
    },

    /// Watched button: marks the movie watched, or removes it when already watched
    Watched {
        /// Movie ID
        id: MovieId,
        /// Stars from 0 (unrated) to 5
        #[arg(short, long, default_value_t = 0)]
        rating: u8,
    },

    /// Change the rating of a watched movie
    Rate {
        /// Movie ID
        id: MovieId,
        /// Stars from 0 (unrated) to 5
        rating: u8,
    },

    /// Remove a movie from your diary
    Remove {
        /// Movie ID
        id: MovieId,
    },

    /// Show your wishlist and watched movies
    Diary,

    /// Show your profile
    Profile,

    /// Edit username, email or preferred genres
    ProfileEdit {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Comma-separated genres, e.g. "Drama,Sci-Fi" (empty clears)
        #[arg(long)]
        prefs: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = AppPaths::resolve(&default_data_dir(), cli.db, cli.log_dir, cli.session)
        .context("resolving data paths")?;
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    if let Err(err) = init_logging(level, &paths.log_dir) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let conn = open_db(&paths.db_path)
        .with_context(|| format!("opening database {}", paths.db_path.display()))?;
    let app = App {
        conn,
        sessions: SessionStore::new(paths.session_path),
    };

    match cli.command {
        Commands::Register {
            username,
            email,
            password,
        } => app.cmd_register(username, email, password),
        Commands::Login { email, password } => app.cmd_login(&email, &password),
        Commands::Logout => app.cmd_logout(),
        Commands::Whoami => app.cmd_whoami(),
        Commands::Feed => app.cmd_feed(),
        Commands::Search { text } => app.cmd_search(&text),
        Commands::Genre { name } => app.cmd_genre(&name),
        Commands::Show { id } => app.cmd_show(id),
        Commands::Wishlist { id } => app.cmd_wishlist(id),
        Commands::Watched { id, rating } => app.cmd_watched(id, rating),
        Commands::Rate { id, rating } => app.cmd_rate(id, rating),
        Commands::Remove { id } => app.cmd_remove(id),
        Commands::Diary => app.cmd_diary(),
        Commands::Profile => app.cmd_profile(),
        Commands::ProfileEdit {
            username,
            email,
            prefs,
        } => app.cmd_profile_edit(username, email, prefs),
    }
}

struct App {
    conn: Connection,
    sessions: SessionStore,
}

impl App {
    fn accounts(&self) -> Result<AccountService<SqliteUserRepository<'_>>> {
        Ok(AccountService::new(SqliteUserRepository::try_new(
            &self.conn,
        )?))
    }

    fn catalog(&self) -> Result<CatalogService<SqliteMovieRepository<'_>>> {
        Ok(CatalogService::new(SqliteMovieRepository::try_new(
            &self.conn,
        )?))
    }

    fn diary(&self) -> Result<DiaryService<SqliteDiaryRepository<'_>>> {
        Ok(DiaryService::new(SqliteDiaryRepository::try_new(
            &self.conn,
        )?))
    }

    fn require_session(&self) -> Result<Session> {
        self.sessions
            .load()?
            .ok_or_else(|| anyhow!("Please login first"))
    }

    fn cmd_register(&self, username: String, email: String, password: String) -> Result<()> {
        let user = self.accounts()?.register(&RegisterRequest {
            username,
            email,
            password,
        })?;
        println!("Registration successful! Welcome, {}.", user.username);
        println!("Run `moviediary login` to sign in.");
        Ok(())
    }

    fn cmd_login(&self, email: &str, password: &str) -> Result<()> {
        let user = self.accounts()?.login(email, password)?;
        self.sessions.create(&Session::from(&user))?;
        info!("event=session_create module=cli status=ok user_id={}", user.id);
        println!("Welcome back, {}!", user.username);
        Ok(())
    }

    fn cmd_logout(&self) -> Result<()> {
        if self.sessions.clear()? {
            info!("event=session_clear module=cli status=ok");
            println!("Logged out successfully");
        } else {
            println!("Not logged in");
        }
        Ok(())
    }

    fn cmd_whoami(&self) -> Result<()> {
        match self.sessions.load()? {
            Some(session) => println!(
                "{} <{}> (user {})",
                session.username, session.email, session.user_id
            ),
            None => println!("Not logged in"),
        }
        Ok(())
    }

    fn cmd_feed(&self) -> Result<()> {
        let session = self.sessions.load()?;
        let preferences = match &session {
            Some(session) => self.accounts()?.preferences(session.user_id)?,
            None => GenrePreferences::default(),
        };

        let feed = self
            .catalog()?
            .home_feed(session.as_ref().map(|s| s.user_id), &preferences)?;

        if !preferences.is_empty() {
            println!("Ranked for: {}", preferences.tags().join(", "));
        }
        for item in &feed {
            println!("{}", feed_line(item));
        }
        Ok(())
    }

    fn cmd_search(&self, text: &str) -> Result<()> {
        let movies = self.catalog()?.search(text)?;
        if movies.is_empty() {
            println!("No movies found");
        }
        for movie in &movies {
            println!("{}", movie_line(movie));
        }
        Ok(())
    }

    fn cmd_genre(&self, name: &str) -> Result<()> {
        let movies = self.catalog()?.by_genre(name)?;
        if movies.is_empty() {
            println!("No movies found in genre '{}'", name.trim());
        }
        for movie in &movies {
            println!("{}", movie_line(movie));
        }
        Ok(())
    }

    fn cmd_show(&self, id: MovieId) -> Result<()> {
        let movie = self.catalog()?.movie(id)?;
        println!("{}", movie_details(&movie));

        if let Some(session) = self.sessions.load()? {
            let state = match self.diary()?.entry(session.user_id, id)? {
                Some(entry) => diary_state(entry.status, entry.rating),
                None => "not in your diary".to_string(),
            };
            println!("\nYour diary: {state}");
        }
        Ok(())
    }

    fn cmd_wishlist(&self, id: MovieId) -> Result<()> {
        let session = self.require_session()?;
        let movie = self.catalog()?.movie(id)?;
        match self.diary()?.toggle_wishlist(session.user_id, id)? {
            Some(_) => println!("Added \"{}\" to your wishlist", movie.title),
            None => println!("Removed \"{}\" from your wishlist", movie.title),
        }
        Ok(())
    }

    fn cmd_watched(&self, id: MovieId, rating: u8) -> Result<()> {
        let session = self.require_session()?;
        let movie = self.catalog()?.movie(id)?;
        match self.diary()?.toggle_watched(session.user_id, id, rating)? {
            Some(entry) => println!(
                "Marked \"{}\" as {}",
                movie.title,
                diary_state(entry.status, entry.rating)
            ),
            None => println!("Removed \"{}\" from your watched movies", movie.title),
        }
        Ok(())
    }

    fn cmd_rate(&self, id: MovieId, rating: u8) -> Result<()> {
        let session = self.require_session()?;
        let movie = self.catalog()?.movie(id)?;
        let entry = self.diary()?.rate(session.user_id, id, rating)?;
        println!(
            "Rated \"{}\": {}",
            movie.title,
            diary_state(entry.status, entry.rating)
        );
        Ok(())
    }

    fn cmd_remove(&self, id: MovieId) -> Result<()> {
        let session = self.require_session()?;
        self.diary()?.remove(session.user_id, id)?;
        println!("Removed");
        Ok(())
    }

    fn cmd_diary(&self) -> Result<()> {
        let session = self.require_session()?;
        let diary = self.diary()?;

        let wishlist = diary.wishlist(session.user_id)?;
        println!("Wishlist ({})", wishlist.len());
        for item in &wishlist {
            println!("{}", movie_line(&item.movie));
        }

        let watched = diary.watched(session.user_id)?;
        println!("\nWatched ({})", watched.len());
        for item in &watched {
            println!("{}", feed_line(item));
        }
        Ok(())
    }

    fn cmd_profile(&self) -> Result<()> {
        let session = self.require_session()?;
        let accounts = self.accounts()?;
        let user = accounts
            .get_user(session.user_id)?
            .ok_or_else(|| anyhow!("account {} no longer exists", session.user_id))?;
        let preferences = accounts.preferences(user.id)?;

        println!("Username: {}", user.username);
        println!("Email:    {}", user.email);
        println!("Genres:");
        let selected = preferences.selected_known_genres();
        for genre in KNOWN_GENRES {
            let mark = if selected.contains(&genre) { 'x' } else { ' ' };
            println!("  [{mark}] {genre}");
        }
        Ok(())
    }

    fn cmd_profile_edit(
        &self,
        username: Option<String>,
        email: Option<String>,
        prefs: Option<String>,
    ) -> Result<()> {
        let session = self.require_session()?;
        let accounts = self.accounts()?;
        let current = accounts
            .get_user(session.user_id)?
            .ok_or_else(|| anyhow!("account {} no longer exists", session.user_id))?;

        let preferences = match prefs {
            Some(csv) => selected_genres(&csv),
            None => current.preferences.clone(),
        };
        let user = accounts.update_profile(
            current.id,
            &ProfileUpdate {
                username: username.unwrap_or(current.username),
                email: email.unwrap_or(current.email),
                preferences,
            },
        )?;

        self.sessions.update(&user.username, &user.email)?;
        println!("Profile updated!");
        Ok(())
    }
}

/// Keeps the known genres named in `csv`, warning about the rest.
fn selected_genres(csv: &str) -> String {
    let requested = GenrePreferences::parse(csv);
    let selection = GenrePreferences::from_selection(requested.tags());
    for tag in requested.tags() {
        if canonical_genre(tag).is_none() {
            eprintln!(
                "warning: ignoring unknown genre '{tag}' (known: {})",
                KNOWN_GENRES.join(", ")
            );
        }
    }
    selection.to_csv()
}

#[cfg(test)]
mod tests {
    use super::{selected_genres, App, Cli};
    use crate::session::SessionStore;
    use clap::CommandFactory;
    use moviediary_core::db::open_db_in_memory;
    use moviediary_core::DiaryStatus;
    use tempfile::TempDir;

    fn app() -> (App, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let app = App {
            conn: open_db_in_memory().unwrap(),
            sessions: SessionStore::new(dir.path().join("session.json")),
        };
        (app, dir)
    }

    fn logged_in_app() -> (App, TempDir) {
        let (app, dir) = app();
        app.cmd_register(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "secret".to_string(),
        )
        .unwrap();
        app.cmd_login("alice@example.com", "secret").unwrap();
        (app, dir)
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn selected_genres_keeps_known_names_in_canonical_order() {
        assert_eq!(selected_genres("sci-fi, drama, Western"), "Drama,Sci-Fi");
        assert_eq!(selected_genres("Drama,scifi"), "Drama,Sci-Fi");
        assert_eq!(selected_genres(""), "");
    }

    #[test]
    fn user_commands_require_login() {
        let (app, _dir) = app();

        for result in [
            app.cmd_wishlist(1),
            app.cmd_watched(1, 3),
            app.cmd_rate(1, 3),
            app.cmd_remove(1),
            app.cmd_diary(),
            app.cmd_profile(),
            app.cmd_profile_edit(None, Some("x@example.com".to_string()), None),
        ] {
            let err = result.unwrap_err();
            assert_eq!(err.to_string(), "Please login first");
        }

        app.cmd_feed().unwrap();
        app.cmd_show(1).unwrap();
    }

    #[test]
    fn login_and_logout_manage_the_session_file() {
        let (app, _dir) = logged_in_app();
        let session = app.sessions.load().unwrap().unwrap();
        assert_eq!(session.username, "alice");

        app.cmd_logout().unwrap();
        assert!(app.sessions.load().unwrap().is_none());
        assert!(app.cmd_login("alice@example.com", "wrong").is_err());
        assert!(app.sessions.load().unwrap().is_none());
    }

    #[test]
    fn profile_edit_merges_flags_with_current_profile() {
        let (app, _dir) = logged_in_app();
        app.cmd_profile_edit(None, None, Some("Drama,scifi".to_string()))
            .unwrap();

        app.cmd_profile_edit(None, Some("alicia@example.com".to_string()), None)
            .unwrap();

        let session = app.sessions.load().unwrap().unwrap();
        assert_eq!(session.username, "alice");
        assert_eq!(session.email, "alicia@example.com");

        let user = app.accounts().unwrap().get_user(session.user_id).unwrap().unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alicia@example.com");
        assert_eq!(user.preferences, "Drama,Sci-Fi");
    }

    #[test]
    fn wishlist_and_watched_commands_toggle_diary_state() {
        let (app, _dir) = logged_in_app();
        let user_id = app.sessions.load().unwrap().unwrap().user_id;
        let diary = app.diary().unwrap();

        app.cmd_wishlist(1).unwrap();
        assert_eq!(
            diary.entry(user_id, 1).unwrap().map(|e| e.status),
            Some(DiaryStatus::Wishlist)
        );

        app.cmd_watched(1, 4).unwrap();
        assert!(app.cmd_rate(1, 6).is_err());
        app.cmd_rate(1, 5).unwrap();
        assert_eq!(
            diary.entry(user_id, 1).unwrap().map(|e| e.rating.value()),
            Some(5)
        );

        app.cmd_watched(1, 0).unwrap();
        assert!(diary.entry(user_id, 1).unwrap().is_none());
        assert!(app.cmd_wishlist(999).is_err());
    }
}
