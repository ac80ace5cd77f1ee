use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::exercise::Exercise;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSet {
  pub reps: u32,
  pub weight: f64,
  pub completed: bool,
  /// Per-set override of the default rest duration, in seconds
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rest_time: Option<u32>,
}

impl WorkoutSet {
  pub fn new(reps: u32, weight: f64) -> Self {
    Self {
      reps,
      weight,
      completed: false,
      rest_time: None,
    }
  }

  pub fn volume(&self) -> f64 {
    self.reps as f64 * self.weight
  }
}

impl Default for WorkoutSet {
  fn default() -> Self {
    Self::new(0, 0.0)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExercise {
  pub exercise_id: String,
  pub exercise: Exercise,
  pub sets: Vec<WorkoutSet>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
}

impl WorkoutExercise {
  /// Seeds the exercise with a single empty set
  pub fn from_catalog(exercise: &Exercise) -> Self {
    Self {
      exercise_id: exercise.id.clone(),
      exercise: exercise.clone(),
      sets: vec![WorkoutSet::default()],
      notes: None,
    }
  }

  pub fn completed_sets(&self) -> impl Iterator<Item = &WorkoutSet> {
    self.sets.iter().filter(|s| s.completed)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
  pub id: String,
  #[serde(rename = "date")]
  pub started_at: DateTime<Utc>,
  pub name: String,
  pub exercises: Vec<WorkoutExercise>,
  /// Wall-clock seconds from start to finish, set once at completion
  #[serde(rename = "duration")]
  pub duration_seconds: i64,
  pub total_volume: f64,
  pub completed: bool,
}

impl Workout {
  /// A fresh, in-progress workout with no exercises
  pub fn begin(name: &str, started_at: DateTime<Utc>) -> Self {
    Self {
      id: started_at.timestamp_millis().to_string(),
      started_at,
      name: name.to_string(),
      exercises: Vec::new(),
      duration_seconds: 0,
      total_volume: 0.0,
      completed: false,
    }
  }

  /// Sum of reps x weight over completed sets only
  pub fn completed_volume(&self) -> f64 {
    self
      .exercises
      .iter()
      .flat_map(|e| e.completed_sets())
      .map(WorkoutSet::volume)
      .sum()
  }

  pub fn completed_set_count(&self) -> usize {
    self.exercises.iter().map(|e| e.completed_sets().count()).sum()
  }
}
