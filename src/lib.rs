pub mod analysis;
pub mod catalog;
mod cli;
pub mod commands;
pub mod config;
pub mod db;
mod logging;
pub mod models;
pub mod session;
pub mod storage;
pub mod timer;

#[cfg(test)]
mod test_utils;

pub use analysis::{
  one_rep_max, AnalysisError, ExerciseProgressPoint, ExerciseVolume, PersonalRecord, VolumePoint,
  WorkoutStats,
};
pub use config::{AppConfig, ConfigError};
pub use db::AppState;
pub use models::{Exercise, ProgressData, UserPreferences, Workout, WorkoutExercise, WorkoutSet};
pub use session::{FinishedWorkout, SessionError, SessionState, SetUpdate, WorkoutSession};
pub use storage::{KeyValueStore, KvWrite, MemoryStore, SqliteStore, Storage, StorageError};
pub use timer::{RestTimer, DEFAULT_REST_SECONDS};

use clap::Parser;
use tracing::info;

/// Parse the command line, open the store and run one action
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  let cli = cli::Cli::parse();
  let config = AppConfig::from_env()?;
  logging::init_logging(&config, cli.verbose);

  let pool = db::initialize_db(&config).await?;
  let state = AppState::from_pool(pool.clone()).await;
  info!("Database ready");

  let result = cli::execute(cli.command, &state).await;
  pool.close().await;
  result.map_err(Into::into)
}
