use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of one completed set, appended when a workout finishes.
/// Historical fact: never edited after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressData {
  pub date: DateTime<Utc>,
  pub exercise_id: String,
  pub weight: f64,
  pub reps: u32,
  pub volume: f64,
  pub one_rep_max: f64,
}
