//! Persistence adapter
//!
//! Key-value contract over a durable store. Values are JSON documents and
//! every write replaces the whole value for its key. [`Storage`] layers the
//! four application records on top and never fails a read: missing or
//! malformed data degrades to the empty/default value.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::models::{ProgressData, UserPreferences, Workout};

pub const WORKOUTS_KEY: &str = "workouts";
pub const PROGRESS_KEY: &str = "progress";
pub const PREFERENCES_KEY: &str = "preferences";
pub const CURRENT_WORKOUT_KEY: &str = "current-workout";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// One write inside an atomic batch
#[derive(Debug, Clone, PartialEq)]
pub enum KvWrite {
  Set { key: String, value: String },
  Remove { key: String },
}

impl KvWrite {
  pub fn key(&self) -> &str {
    match self {
      Self::Set { key, .. } | Self::Remove { key } => key,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Key-Value Contract
/// ---------------------------------------------------------------------------

#[async_trait]
pub trait KeyValueStore: Send + Sync {
  async fn get(&self, key: &str) -> StorageResult<Option<String>>;

  /// Replace the value stored under `key`
  async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

  async fn remove(&self, key: &str) -> StorageResult<()>;

  /// Apply every write or none of them
  async fn write_batch(&self, writes: &[KvWrite]) -> StorageResult<()>;
}

const UPSERT_SQL: &str = r#"
  INSERT INTO kv_store (key, value, updated_at)
  VALUES (?1, ?2, CURRENT_TIMESTAMP)
  ON CONFLICT(key) DO UPDATE SET
    value = excluded.value,
    updated_at = CURRENT_TIMESTAMP
"#;

const DELETE_SQL: &str = "DELETE FROM kv_store WHERE key = ?1";

/// SQLite-backed store, one row per key
#[derive(Clone)]
pub struct SqliteStore {
  pool: SqlitePool,
}

impl SqliteStore {
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
  async fn get(&self, key: &str) -> StorageResult<Option<String>> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
      .bind(key)
      .fetch_optional(&self.pool)
      .await?;
    Ok(value)
  }

  async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
    sqlx::query(UPSERT_SQL)
      .bind(key)
      .bind(value)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn remove(&self, key: &str) -> StorageResult<()> {
    sqlx::query(DELETE_SQL).bind(key).execute(&self.pool).await?;
    Ok(())
  }

  async fn write_batch(&self, writes: &[KvWrite]) -> StorageResult<()> {
    // Dropping the transaction on an early return rolls it back
    let mut tx = self.pool.begin().await?;
    for write in writes {
      match write {
        KvWrite::Set { key, value } => {
          sqlx::query(UPSERT_SQL)
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }
        KvWrite::Remove { key } => {
          sqlx::query(DELETE_SQL).bind(key).execute(&mut *tx).await?;
        }
      }
    }
    tx.commit().await?;
    Ok(())
  }
}

/// In-process store; contents are lost when dropped
#[derive(Default)]
pub struct MemoryStore {
  entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
  async fn get(&self, key: &str) -> StorageResult<Option<String>> {
    Ok(self.entries.read().await.get(key).cloned())
  }

  async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
    self
      .entries
      .write()
      .await
      .insert(key.to_string(), value.to_string());
    Ok(())
  }

  async fn remove(&self, key: &str) -> StorageResult<()> {
    self.entries.write().await.remove(key);
    Ok(())
  }

  async fn write_batch(&self, writes: &[KvWrite]) -> StorageResult<()> {
    let mut entries = self.entries.write().await;
    for write in writes {
      match write {
        KvWrite::Set { key, value } => {
          entries.insert(key.clone(), value.clone());
        }
        KvWrite::Remove { key } => {
          entries.remove(key);
        }
      }
    }
    Ok(())
  }
}

/// ---------------------------------------------------------------------------
/// Typed Records
/// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct Storage {
  store: Arc<dyn KeyValueStore>,
}

impl Storage {
  pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
    Self { store }
  }

  pub fn in_memory() -> Self {
    Self::new(Arc::new(MemoryStore::new()))
  }

  /// Read for display: backend errors degrade to absent
  async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
    match self.load_json(key).await {
      Ok(value) => value,
      Err(e) => {
        warn!(key, error = %e, "Failed to read stored value, treating as absent");
        None
      }
    }
  }

  /// Read that a write will build on. Backend errors propagate so a
  /// failed read never overwrites the stored list with a fresh one.
  /// Malformed values still read as absent.
  async fn load_json<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
    let Some(raw) = self.store.get(key).await? else {
      return Ok(None);
    };

    match serde_json::from_str(&raw) {
      Ok(value) => Ok(Some(value)),
      Err(e) => {
        warn!(key, error = %e, "Malformed stored value, treating as absent");
        Ok(None)
      }
    }
  }

  async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
    let json = serde_json::to_string(value)?;
    self.store.set(key, &json).await?;
    debug!(key, bytes = json.len(), "Stored value");
    Ok(())
  }

  async fn load_workouts(&self) -> StorageResult<Vec<Workout>> {
    Ok(self.load_json(WORKOUTS_KEY).await?.unwrap_or_default())
  }

  async fn load_progress(&self) -> StorageResult<Vec<ProgressData>> {
    Ok(self.load_json(PROGRESS_KEY).await?.unwrap_or_default())
  }

  /// Completed workouts, oldest first
  pub async fn workouts(&self) -> Vec<Workout> {
    self.read_json(WORKOUTS_KEY).await.unwrap_or_default()
  }

  pub async fn save_workouts(&self, workouts: &[Workout]) -> StorageResult<()> {
    self.write_json(WORKOUTS_KEY, workouts).await
  }

  pub async fn add_workout(&self, workout: &Workout) -> StorageResult<()> {
    let mut workouts = self.load_workouts().await?;
    workouts.push(workout.clone());
    self.save_workouts(&workouts).await
  }

  pub async fn progress(&self) -> Vec<ProgressData> {
    self.read_json(PROGRESS_KEY).await.unwrap_or_default()
  }

  /// Append entries to the progress history in one write
  pub async fn append_progress(&self, entries: &[ProgressData]) -> StorageResult<()> {
    if entries.is_empty() {
      return Ok(());
    }
    let mut progress = self.load_progress().await?;
    progress.extend_from_slice(entries);
    self.write_json(PROGRESS_KEY, &progress).await
  }

  /// Move a finished workout into history in one atomic batch: append it
  /// to the workout list, append its progress entries and clear the
  /// in-progress slot. On error nothing is written.
  pub async fn record_finished(&self, workout: &Workout, entries: &[ProgressData]) -> StorageResult<()> {
    let mut workouts = self.load_workouts().await?;
    workouts.push(workout.clone());
    let mut progress = self.load_progress().await?;
    progress.extend_from_slice(entries);

    let writes = [
      KvWrite::Set {
        key: WORKOUTS_KEY.to_string(),
        value: serde_json::to_string(&workouts)?,
      },
      KvWrite::Set {
        key: PROGRESS_KEY.to_string(),
        value: serde_json::to_string(&progress)?,
      },
      KvWrite::Remove {
        key: CURRENT_WORKOUT_KEY.to_string(),
      },
    ];
    self.store.write_batch(&writes).await?;
    debug!(
      workouts = workouts.len(),
      progress = progress.len(),
      "Recorded finished workout"
    );
    Ok(())
  }

  pub async fn preferences(&self) -> UserPreferences {
    self.read_json(PREFERENCES_KEY).await.unwrap_or_default()
  }

  pub async fn save_preferences(&self, preferences: &UserPreferences) -> StorageResult<()> {
    self.write_json(PREFERENCES_KEY, preferences).await
  }

  pub async fn current_workout(&self) -> Option<Workout> {
    self.read_json(CURRENT_WORKOUT_KEY).await
  }

  /// Persist the in-progress workout, or clear the slot with `None`
  pub async fn save_current_workout(&self, workout: Option<&Workout>) -> StorageResult<()> {
    match workout {
      Some(workout) => self.write_json(CURRENT_WORKOUT_KEY, workout).await,
      None => {
        self.store.remove(CURRENT_WORKOUT_KEY).await?;
        debug!(key = CURRENT_WORKOUT_KEY, "Removed value");
        Ok(())
      }
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
