use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::AppConfig;
use crate::session::WorkoutSession;
use crate::storage::{SqliteStore, Storage};

pub type DbPool = SqlitePool;

/// Application state shared by the command layer
pub struct AppState {
  pub storage: Storage,
  /// The single coordinating owner of the active workout
  pub session: Mutex<WorkoutSession>,
}

impl AppState {
  pub async fn new(storage: Storage) -> Self {
    let session = WorkoutSession::restore(storage.clone()).await;
    Self {
      storage,
      session: Mutex::new(session),
    }
  }

  pub async fn from_pool(pool: DbPool) -> Self {
    Self::new(Storage::new(Arc::new(SqliteStore::new(pool)))).await
  }
}

/// Make sure the directory holding the database exists
fn prepare_db_dir(db_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
  if let Some(parent) = db_path.parent() {
    if !parent.as_os_str().is_empty() {
      fs::create_dir_all(parent)?;
    }
  }
  Ok(())
}

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(config: &AppConfig) -> Result<DbPool, Box<dyn std::error::Error>> {
  prepare_db_dir(&config.db_path)?;
  let db_url = format!("sqlite://{}?mode=rwc", config.db_path.display());

  info!(path = %config.db_path.display(), "Initializing database");

  // Create connection pool
  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&db_url)
    .await?;

  // Run migrations
  sqlx::migrate!("./migrations").run(&pool).await?;

  info!("Database initialized successfully");

  Ok(pool)
}
