//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - Seeding helpers
//! - A key-value store with switchable failures
//! - Helper assertions

use crate::analysis::one_rep_max;
use crate::catalog::find_exercise;
use crate::models::{ProgressData, Workout, WorkoutExercise, WorkoutSet};
use crate::storage::{KeyValueStore, KvWrite, MemoryStore, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::Mutex;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Seed progress history with one entry per day for `days` days,
/// ending today. Returns the seeded entries, oldest first.
pub async fn seed_test_progress(storage: &Storage, exercise_id: &str, days: i64) -> Vec<ProgressData> {
  let entries: Vec<ProgressData> = (0..days)
    .rev()
    .map(|days_ago| mock_progress(exercise_id, days_ago, 60.0 + (days - days_ago) as f64, 5))
    .collect();

  storage
    .append_progress(&entries)
    .await
    .expect("Failed to seed progress");

  entries
}

/// ---------------------------------------------------------------------------
/// Failing Store
/// ---------------------------------------------------------------------------

/// In-memory store whose reads and writes can be made to fail per key.
/// A batch touching any failing key is rejected as a whole.
#[derive(Default)]
pub struct FaultyStore {
  inner: MemoryStore,
  failing_reads: Mutex<HashSet<String>>,
  failing_writes: Mutex<HashSet<String>>,
}

impl FaultyStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn fail_reads_of(&self, key: &str) {
    self.failing_reads.lock().unwrap().insert(key.to_string());
  }

  pub fn fail_writes_to(&self, key: &str) {
    self.failing_writes.lock().unwrap().insert(key.to_string());
  }

  /// Clear every injected failure
  pub fn heal(&self) {
    self.failing_reads.lock().unwrap().clear();
    self.failing_writes.lock().unwrap().clear();
  }

  fn check(set: &Mutex<HashSet<String>>, key: &str) -> StorageResult<()> {
    if set.lock().unwrap().contains(key) {
      return Err(StorageError::Database(sqlx::Error::PoolClosed));
    }
    Ok(())
  }
}

#[async_trait]
impl KeyValueStore for FaultyStore {
  async fn get(&self, key: &str) -> StorageResult<Option<String>> {
    Self::check(&self.failing_reads, key)?;
    self.inner.get(key).await
  }

  async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
    Self::check(&self.failing_writes, key)?;
    self.inner.set(key, value).await
  }

  async fn remove(&self, key: &str) -> StorageResult<()> {
    Self::check(&self.failing_writes, key)?;
    self.inner.remove(key).await
  }

  async fn write_batch(&self, writes: &[KvWrite]) -> StorageResult<()> {
    for write in writes {
      Self::check(&self.failing_writes, write.key())?;
    }
    self.inner.write_batch(writes).await
  }
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// A finished bench press workout: one completed 100x5 set and one skipped set
pub fn mock_workout(name: &str, days_ago: i64) -> Workout {
  let exercise = find_exercise("bench-press").expect("bench-press is in the catalog");
  let mut bench = WorkoutExercise::from_catalog(exercise);
  bench.sets = vec![
    WorkoutSet {
      completed: true,
      ..WorkoutSet::new(5, 100.0)
    },
    WorkoutSet::new(5, 100.0),
  ];

  let mut workout = Workout::begin(name, datetime_days_ago(days_ago));
  workout.exercises.push(bench);
  workout.duration_seconds = 3600;
  workout.total_volume = workout.completed_volume();
  workout.completed = true;
  workout
}

/// A progress entry recorded at noon UTC, `days_ago` days before today
pub fn mock_progress(exercise_id: &str, days_ago: i64, weight: f64, reps: u32) -> ProgressData {
  ProgressData {
    date: noon_days_ago(days_ago),
    exercise_id: exercise_id.to_string(),
    weight,
    reps,
    volume: weight * reps as f64,
    one_rep_max: one_rep_max(weight, reps).unwrap_or(weight),
  }
}

/// A progress entry with an explicit one-rep-max, for ranking tests
pub fn mock_record(exercise_id: &str, days_ago: i64, one_rep_max: f64) -> ProgressData {
  ProgressData {
    one_rep_max,
    ..mock_progress(exercise_id, days_ago, 50.0, 5)
  }
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Create a DateTime N days ago from now
pub fn datetime_days_ago(days: i64) -> DateTime<Utc> {
  Utc::now() - Duration::days(days)
}

/// Noon UTC on the day N days before today, stable across the test run
pub fn noon_days_ago(days: i64) -> DateTime<Utc> {
  let today = Utc::now().date_naive();
  let noon = (today - Duration::days(days))
    .and_hms_opt(12, 0, 0)
    .expect("noon is a valid time");
  Utc.from_utc_datetime(&noon)
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name = 'kv_store'"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 1, "Expected kv_store table");

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_progress_returns_correct_count() {
    let storage = Storage::in_memory();

    let seeded = seed_test_progress(&storage, "squat", 5).await;
    assert_eq!(seeded.len(), 5);
    assert!(seeded.windows(2).all(|w| w[0].date < w[1].date));

    assert_eq!(storage.progress().await.len(), 5);
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let workout = mock_workout("Push", 1);
    assert!(workout.completed);
    assert_eq!(workout.total_volume, 500.0);
    assert_eq!(workout.exercises[0].sets.len(), 2);

    let entry = mock_progress("bench-press", 0, 100.0, 10);
    assert_eq!(entry.volume, 1000.0);
    assert_eq!(entry.one_rep_max, 133.0);
  }

  #[tokio::test]
  async fn test_faulty_store_rejects_whole_batch() {
    let store = FaultyStore::new();
    store.fail_writes_to("b");

    let batch = [
      KvWrite::Set { key: "a".to_string(), value: "1".to_string() },
      KvWrite::Set { key: "b".to_string(), value: "2".to_string() },
    ];
    assert!(store.write_batch(&batch).await.is_err());
    assert_eq!(store.get("a").await.unwrap(), None);

    store.heal();
    store.write_batch(&batch).await.unwrap();
    assert_eq!(store.get("b").await.unwrap(), Some("2".to_string()));
  }

  #[test]
  fn test_datetime_helpers_produce_correct_dates() {
    let now = Utc::now();
    let past = datetime_days_ago(7);

    let diff = now - past;
    // Allow for slight timing differences (6-8 days is acceptable)
    assert!(diff.num_days() >= 6 && diff.num_days() <= 8,
            "Expected ~7 days difference, got {}", diff.num_days());

    assert_eq!(
      (noon_days_ago(0) - noon_days_ago(3)).num_days(),
      3
    );
  }
}
