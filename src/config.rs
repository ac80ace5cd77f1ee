//! Runtime configuration
//!
//! Read from the process environment after `.env` has been loaded.

use std::env;
use std::path::PathBuf;

use directories::ProjectDirs;

pub const DB_PATH_VAR: &str = "WORKOUT_TRACKER_DB";
pub const LOG_VAR: &str = "WORKOUT_TRACKER_LOG";

const DB_FILE_NAME: &str = "workout-tracker.db";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Could not determine a data directory; set {var}", var = DB_PATH_VAR)]
  NoDataDir,

  #[error("{var} is set but empty", var = DB_PATH_VAR)]
  EmptyDbPath,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
  pub db_path: PathBuf,
  /// Tracing filter directive, overridden by RUST_LOG
  pub log_filter: Option<String>,
}

impl AppConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    let db_path = match env::var(DB_PATH_VAR) {
      Ok(path) if path.trim().is_empty() => return Err(ConfigError::EmptyDbPath),
      Ok(path) => PathBuf::from(path),
      Err(_) => default_db_path()?,
    };

    let log_filter = env::var(LOG_VAR).ok().filter(|f| !f.trim().is_empty());

    Ok(Self { db_path, log_filter })
  }
}

/// Platform data directory, e.g. ~/.local/share/workout-tracker/workout-tracker.db
fn default_db_path() -> Result<PathBuf, ConfigError> {
  let dirs = ProjectDirs::from("com", "workout-tracker", "workout-tracker")
    .ok_or(ConfigError::NoDataDir)?;
  Ok(dirs.data_dir().join(DB_FILE_NAME))
}
