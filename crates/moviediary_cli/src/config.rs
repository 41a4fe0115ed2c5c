//! Filesystem locations used by the CLI.
//!
//! Explicit flags (or their `MOVIEDIARY_*` env fallbacks) win; anything left
//! unset lives under the platform data directory.

use std::io;
use std::path::{Path, PathBuf};

const DB_FILE_NAME: &str = "moviediary.sqlite3";
const SESSION_FILE_NAME: &str = "session.json";
const LOG_DIR_NAME: &str = "logs";

/// Resolved, absolute paths for one CLI invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub session_path: PathBuf,
}

impl AppPaths {
    /// Fills unset locations from `data_dir` and makes every path absolute.
    pub fn resolve(
        data_dir: &Path,
        db: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        session: Option<PathBuf>,
    ) -> io::Result<Self> {
        Ok(Self {
            db_path: absolutize(db.unwrap_or_else(|| data_dir.join(DB_FILE_NAME)))?,
            log_dir: absolutize(log_dir.unwrap_or_else(|| data_dir.join(LOG_DIR_NAME)))?,
            session_path: absolutize(
                session.unwrap_or_else(|| data_dir.join(SESSION_FILE_NAME)),
            )?,
        })
    }
}

/// Per-user data directory, or `<tmp>/moviediary` when the platform has none.
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "moviediary")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("moviediary"))
}

fn absolutize(path: PathBuf) -> io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(std::env::current_dir()?.join(path))
}

#[cfg(test)]
mod tests {
    use super::{default_data_dir, AppPaths};
    use std::path::PathBuf;

    #[test]
    fn unset_paths_live_under_data_dir() {
        let data_dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::resolve(data_dir.path(), None, None, None).unwrap();

        assert_eq!(paths.db_path, data_dir.path().join("moviediary.sqlite3"));
        assert_eq!(paths.log_dir, data_dir.path().join("logs"));
        assert_eq!(paths.session_path, data_dir.path().join("session.json"));
    }

    #[test]
    fn explicit_paths_win_and_relative_ones_become_absolute() {
        let data_dir = tempfile::tempdir().unwrap();
        let custom_db = data_dir.path().join("custom.db");
        let paths = AppPaths::resolve(
            data_dir.path(),
            Some(custom_db.clone()),
            Some(PathBuf::from("relative-logs")),
            None,
        )
        .unwrap();

        assert_eq!(paths.db_path, custom_db);
        assert!(paths.log_dir.is_absolute());
        assert!(paths.log_dir.ends_with("relative-logs"));
    }

    #[test]
    fn default_data_dir_is_absolute() {
        assert!(default_data_dir().is_absolute());
    }
}
