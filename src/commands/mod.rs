pub mod analysis;
pub mod catalog;
pub mod workout;

use crate::analysis::{workout_stats, WorkoutStats};
use crate::db::AppState;
use crate::models::{Theme, UserPreferences, WeightUnit, Workout};
use chrono::Utc;

/// Completed workouts, most recent first
pub async fn get_workouts(state: &AppState) -> Result<Vec<Workout>, String> {
  let mut workouts = state.storage.workouts().await;
  workouts.reverse();
  Ok(workouts)
}

pub async fn get_workout_stats(state: &AppState) -> Result<WorkoutStats, String> {
  let workouts = state.storage.workouts().await;
  Ok(workout_stats(&workouts, Utc::now()))
}

/// ---------------------------------------------------------------------------
/// User Preferences Commands
/// ---------------------------------------------------------------------------

pub async fn get_preferences(state: &AppState) -> Result<UserPreferences, String> {
  Ok(state.storage.preferences().await)
}

/// Only the provided fields change
pub async fn update_preferences(
  state: &AppState,
  weight_unit: Option<WeightUnit>,
  default_rest_time: Option<u32>,
  theme: Option<Theme>,
) -> Result<UserPreferences, String> {
  let mut prefs = state.storage.preferences().await;
  if let Some(unit) = weight_unit {
    prefs.weight_unit = unit;
  }
  if let Some(seconds) = default_rest_time {
    prefs.default_rest_time = seconds;
  }
  if let Some(theme) = theme {
    prefs.theme = theme;
  }

  state
    .storage
    .save_preferences(&prefs)
    .await
    .map_err(|e| format!("Failed to update preferences: {}", e))?;

  Ok(prefs)
}
