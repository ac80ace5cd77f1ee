//! Deterministic analysis layer for strength history
//!
//! Pure, read-only aggregations over the progress record and the workout
//! history. Every function here takes a snapshot and returns a new value;
//! nothing touches storage.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::exercise_name;
use crate::models::{ProgressData, Workout};

/// Distinct calendar dates kept by the volume trend
pub const VOLUME_TREND_DAYS: usize = 10;
/// Entries returned by the top-exercise and personal-record rankings
pub const RANKING_LIMIT: usize = 5;
/// Brzycki's denominator (37 - reps) must stay positive
pub const BRZYCKI_MAX_REPS: u32 = 36;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
  #[error("One-rep-max is undefined for {0} reps (maximum {max})", max = BRZYCKI_MAX_REPS)]
  RepsOutOfRange(u32),

  #[error("Invalid weight: {0}")]
  InvalidWeight(f64),
}

/// ---------------------------------------------------------------------------
/// One-Rep-Max (Brzycki)
/// ---------------------------------------------------------------------------

/// Estimated one-rep-max for a set of `reps` at `weight`.
///
/// A single rep is its own max. Otherwise `round(weight * 36 / (37 - reps))`.
pub fn one_rep_max(weight: f64, reps: u32) -> Result<f64, AnalysisError> {
  if !weight.is_finite() || weight < 0.0 {
    return Err(AnalysisError::InvalidWeight(weight));
  }
  if reps > BRZYCKI_MAX_REPS {
    return Err(AnalysisError::RepsOutOfRange(reps));
  }
  if reps == 1 {
    return Ok(weight);
  }
  Ok((weight * 36.0 / (37 - reps) as f64).round())
}

/// ---------------------------------------------------------------------------
/// Volume Over Time
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumePoint {
  pub date: NaiveDate,
  pub volume: f64,
}

/// Daily volume for the most recent training days, oldest first.
/// Days are local calendar dates.
pub fn volume_over_time(history: &[ProgressData]) -> Vec<VolumePoint> {
  volume_over_time_in(history, &Local)
}

pub fn volume_over_time_in<Tz: TimeZone>(history: &[ProgressData], tz: &Tz) -> Vec<VolumePoint> {
  let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
  for entry in history {
    let day = entry.date.with_timezone(tz).date_naive();
    *by_date.entry(day).or_insert(0.0) += entry.volume;
  }

  let skip = by_date.len().saturating_sub(VOLUME_TREND_DAYS);
  by_date
    .into_iter()
    .skip(skip)
    .map(|(date, volume)| VolumePoint { date, volume })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Per-Exercise Progress
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseProgressPoint {
  pub date: DateTime<Utc>,
  pub weight: f64,
  pub one_rep_max: f64,
  pub volume: f64,
}

pub fn exercise_progress(history: &[ProgressData], exercise_id: &str) -> Vec<ExerciseProgressPoint> {
  let mut entries: Vec<&ProgressData> = history
    .iter()
    .filter(|e| e.exercise_id == exercise_id)
    .collect();
  entries.sort_by_key(|e| e.date);

  entries
    .into_iter()
    .map(|e| ExerciseProgressPoint {
      date: e.date,
      weight: e.weight,
      one_rep_max: e.one_rep_max,
      volume: e.volume,
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Rankings
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseVolume {
  pub exercise_id: String,
  pub name: String,
  pub volume: f64,
}

/// Exercises with the most lifetime volume, highest first
pub fn top_exercises(history: &[ProgressData]) -> Vec<ExerciseVolume> {
  let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
  for entry in history {
    *totals.entry(entry.exercise_id.as_str()).or_insert(0.0) += entry.volume;
  }

  // Stable sort keeps id order among equal volumes
  let mut ranked: Vec<(&str, f64)> = totals.into_iter().collect();
  ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

  ranked
    .into_iter()
    .take(RANKING_LIMIT)
    .map(|(id, volume)| ExerciseVolume {
      exercise_id: id.to_string(),
      name: exercise_name(id),
      volume,
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
  pub exercise_name: String,
  #[serde(flatten)]
  pub record: ProgressData,
}

/// Best estimated one-rep-max per exercise, strongest first.
/// On ties the earliest entry holds the record.
pub fn personal_records(history: &[ProgressData]) -> Vec<PersonalRecord> {
  let mut best: BTreeMap<&str, &ProgressData> = BTreeMap::new();
  for entry in history {
    match best.get(entry.exercise_id.as_str()) {
      Some(current) if entry.one_rep_max <= current.one_rep_max => {}
      _ => {
        best.insert(entry.exercise_id.as_str(), entry);
      }
    }
  }

  let mut records: Vec<&ProgressData> = best.into_values().collect();
  records.sort_by(|a, b| b.one_rep_max.total_cmp(&a.one_rep_max));

  records
    .into_iter()
    .take(RANKING_LIMIT)
    .map(|record| PersonalRecord {
      exercise_name: exercise_name(&record.exercise_id),
      record: record.clone(),
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedExercise {
  pub exercise_id: String,
  pub name: String,
}

/// Exercises that appear in the history, in order of first appearance
pub fn tracked_exercises(history: &[ProgressData]) -> Vec<TrackedExercise> {
  let mut tracked: Vec<TrackedExercise> = Vec::new();
  for entry in history {
    if !tracked.iter().any(|t| t.exercise_id == entry.exercise_id) {
      tracked.push(TrackedExercise {
        exercise_id: entry.exercise_id.clone(),
        name: exercise_name(&entry.exercise_id),
      });
    }
  }
  tracked
}

/// ---------------------------------------------------------------------------
/// Workout History Summary
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutStats {
  pub total_workouts: usize,
  /// Workouts started within the seven days before `now`
  pub this_week: usize,
  pub total_volume: f64,
  pub avg_duration_seconds: f64,
}

pub fn workout_stats(workouts: &[Workout], now: DateTime<Utc>) -> WorkoutStats {
  let week_ago = now - Duration::days(7);
  let this_week = workouts.iter().filter(|w| w.started_at > week_ago).count();
  let total_volume = workouts.iter().map(|w| w.total_volume).sum();
  let avg_duration_seconds = if workouts.is_empty() {
    0.0
  } else {
    workouts.iter().map(|w| w.duration_seconds as f64).sum::<f64>() / workouts.len() as f64
  };

  WorkoutStats {
    total_workouts: workouts.len(),
    this_week,
    total_volume,
    avg_duration_seconds,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_approx_eq;
  use crate::test_utils::{mock_progress, mock_record, mock_workout, noon_days_ago};

  #[test]
  fn test_one_rep_max_single_rep_is_weight() {
    for weight in [0.0, 20.0, 62.5, 100.0, 227.5] {
      assert_eq!(one_rep_max(weight, 1), Ok(weight));
    }
  }

  #[test]
  fn test_one_rep_max_brzycki() {
    assert_eq!(one_rep_max(100.0, 10), Ok(133.0));
    assert_eq!(one_rep_max(100.0, 5), Ok(113.0));
    assert_eq!(one_rep_max(80.0, 0), Ok(78.0));
    // Highest defined rep count: denominator is 1
    assert_eq!(one_rep_max(10.0, 36), Ok(360.0));
  }

  #[test]
  fn test_one_rep_max_rejects_out_of_domain() {
    assert_eq!(one_rep_max(100.0, 37), Err(AnalysisError::RepsOutOfRange(37)));
    assert_eq!(one_rep_max(100.0, 50), Err(AnalysisError::RepsOutOfRange(50)));
    assert_eq!(one_rep_max(-5.0, 5), Err(AnalysisError::InvalidWeight(-5.0)));
    assert!(one_rep_max(f64::NAN, 5).is_err());
  }

  #[test]
  fn test_volume_over_time_keeps_ten_most_recent_days() {
    let history: Vec<ProgressData> = (0..15)
      .map(|days_ago| mock_progress("squat", days_ago, 100.0, 1))
      .collect();

    let trend = volume_over_time_in(&history, &Utc);
    assert_eq!(trend.len(), 10);
    assert!(trend.windows(2).all(|w| w[0].date < w[1].date));
    assert_eq!(trend.first().unwrap().date, noon_days_ago(9).date_naive());
    assert_eq!(trend.last().unwrap().date, noon_days_ago(0).date_naive());
  }

  #[test]
  fn test_volume_over_time_sums_same_day() {
    let history = vec![
      mock_progress("squat", 1, 100.0, 5),
      mock_progress("bench-press", 1, 60.0, 10),
      mock_progress("squat", 0, 100.0, 3),
    ];

    let trend = volume_over_time_in(&history, &Utc);
    assert_eq!(trend.len(), 2);
    assert_approx_eq!(trend[0].volume, 1100.0, 1e-9);
    assert_approx_eq!(trend[1].volume, 300.0, 1e-9);
  }

  #[test]
  fn test_volume_over_time_empty_history() {
    assert!(volume_over_time(&[]).is_empty());
  }

  #[test]
  fn test_exercise_progress_filters_and_sorts() {
    let history = vec![
      mock_progress("squat", 0, 110.0, 5),
      mock_progress("bench-press", 1, 80.0, 5),
      mock_progress("squat", 2, 100.0, 5),
    ];

    let series = exercise_progress(&history, "squat");
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].weight, 100.0);
    assert_eq!(series[1].weight, 110.0);
    assert_eq!(series[1].volume, 550.0);
    assert_eq!(series[1].one_rep_max, 124.0);

    assert!(exercise_progress(&history, "deadlift").is_empty());
  }

  #[test]
  fn test_top_exercises_ranks_and_resolves_names() {
    let history = vec![
      mock_progress("squat", 0, 100.0, 10),
      mock_progress("squat", 1, 100.0, 10),
      mock_progress("bench-press", 0, 80.0, 10),
      mock_progress("deadlift", 0, 140.0, 5),
      mock_progress("lunges", 0, 20.0, 10),
      mock_progress("bicep-curls", 0, 15.0, 10),
      mock_progress("sled-push", 0, 10.0, 1),
    ];

    let top = top_exercises(&history);
    assert_eq!(top.len(), RANKING_LIMIT);
    assert_eq!(top[0].exercise_id, "squat");
    assert_eq!(top[0].name, "Squat");
    assert_eq!(top[0].volume, 2000.0);
    assert_eq!(top[1].exercise_id, "bench-press");
    assert_eq!(top[2].exercise_id, "deadlift");
    assert!(top.iter().all(|t| t.exercise_id != "sled-push"));
  }

  #[test]
  fn test_top_exercises_unknown_id_uses_raw_id() {
    let history = vec![mock_progress("sled-push", 0, 50.0, 10)];
    let top = top_exercises(&history);
    assert_eq!(top[0].name, "sled-push");
  }

  #[test]
  fn test_top_exercises_ties_are_deterministic() {
    let history = vec![
      mock_progress("squat", 0, 10.0, 10),
      mock_progress("deadlift", 0, 10.0, 10),
    ];
    let ids: Vec<String> = top_exercises(&history).into_iter().map(|t| t.exercise_id).collect();
    assert_eq!(ids, vec!["deadlift", "squat"]);
  }

  #[test]
  fn test_personal_records_keeps_best_per_exercise() {
    let history = vec![
      mock_record("bench-press", 3, 90.0),
      mock_record("bench-press", 1, 120.0),
      mock_record("squat", 2, 150.0),
    ];

    let records = personal_records(&history);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].record.exercise_id, "squat");
    assert_eq!(records[1].record.exercise_id, "bench-press");
    assert_eq!(records[1].record.one_rep_max, 120.0);
    assert_eq!(records[1].exercise_name, "Bench Press");
  }

  #[test]
  fn test_personal_records_earliest_entry_wins_ties() {
    let history = vec![mock_record("squat", 5, 140.0), mock_record("squat", 1, 140.0)];
    let records = personal_records(&history);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].record.date, noon_days_ago(5));
  }

  #[test]
  fn test_personal_records_limited_to_five() {
    let ids = ["squat", "deadlift", "bench-press", "lunges", "pull-ups", "tricep-dips"];
    let history: Vec<ProgressData> = ids
      .iter()
      .enumerate()
      .map(|(i, id)| mock_record(id, 0, 100.0 + i as f64))
      .collect();

    let records = personal_records(&history);
    assert_eq!(records.len(), RANKING_LIMIT);
    assert_eq!(records[0].record.exercise_id, "tricep-dips");
    assert!(records.iter().all(|r| r.record.exercise_id != "squat"));
  }

  #[test]
  fn test_tracked_exercises_first_appearance_order() {
    let history = vec![
      mock_progress("squat", 2, 100.0, 5),
      mock_progress("bench-press", 1, 80.0, 5),
      mock_progress("squat", 0, 105.0, 5),
    ];
    let tracked = tracked_exercises(&history);
    assert_eq!(tracked.len(), 2);
    assert_eq!(tracked[0].name, "Squat");
    assert_eq!(tracked[1].exercise_id, "bench-press");
  }

  #[test]
  fn test_workout_stats() {
    let mut old = mock_workout("Old", 10);
    old.duration_seconds = 1800;
    let workouts = vec![old, mock_workout("Recent", 2)];

    let stats = workout_stats(&workouts, Utc::now());
    assert_eq!(stats.total_workouts, 2);
    assert_eq!(stats.this_week, 1);
    assert_eq!(stats.total_volume, 1000.0);
    assert_approx_eq!(stats.avg_duration_seconds, 2700.0, 1e-9);

    let empty = workout_stats(&[], Utc::now());
    assert_eq!(empty.avg_duration_seconds, 0.0);
  }
}
