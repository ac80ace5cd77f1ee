use crate::analysis::{
  exercise_progress, personal_records, top_exercises, tracked_exercises, volume_over_time,
  ExerciseProgressPoint, ExerciseVolume, PersonalRecord, TrackedExercise, VolumePoint,
};
use crate::db::AppState;
use serde::Serialize;

/// ---------------------------------------------------------------------------
/// Analytics Commands
/// ---------------------------------------------------------------------------
///
/// Each command reads the progress history fresh, so the views always
/// reflect the latest finished workout.

pub async fn get_volume_over_time(state: &AppState) -> Result<Vec<VolumePoint>, String> {
  let history = state.storage.progress().await;
  Ok(volume_over_time(&history))
}

pub async fn get_exercise_progress(
  state: &AppState,
  exercise_id: String,
) -> Result<Vec<ExerciseProgressPoint>, String> {
  let history = state.storage.progress().await;
  Ok(exercise_progress(&history, &exercise_id))
}

pub async fn get_top_exercises(state: &AppState) -> Result<Vec<ExerciseVolume>, String> {
  let history = state.storage.progress().await;
  Ok(top_exercises(&history))
}

pub async fn get_personal_records(state: &AppState) -> Result<Vec<PersonalRecord>, String> {
  let history = state.storage.progress().await;
  Ok(personal_records(&history))
}

pub async fn get_tracked_exercises(state: &AppState) -> Result<Vec<TrackedExercise>, String> {
  let history = state.storage.progress().await;
  Ok(tracked_exercises(&history))
}

/// Everything the analytics view shows, from one history snapshot
#[derive(Debug, Serialize)]
pub struct AnalyticsOverview {
  pub has_data: bool,
  pub volume_over_time: Vec<VolumePoint>,
  pub top_exercises: Vec<ExerciseVolume>,
  pub personal_records: Vec<PersonalRecord>,
  pub tracked_exercises: Vec<TrackedExercise>,
}

pub async fn get_analytics_overview(state: &AppState) -> Result<AnalyticsOverview, String> {
  let history = state.storage.progress().await;
  Ok(AnalyticsOverview {
    has_data: !history.is_empty(),
    volume_over_time: volume_over_time(&history),
    top_exercises: top_exercises(&history),
    personal_records: personal_records(&history),
    tracked_exercises: tracked_exercises(&history),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::storage::Storage;
  use crate::test_utils::{mock_record, seed_test_progress};

  #[tokio::test]
  async fn test_overview_empty_history() {
    let state = AppState::new(Storage::in_memory()).await;
    let overview = get_analytics_overview(&state).await.unwrap();
    assert!(!overview.has_data);
    assert!(overview.volume_over_time.is_empty());
    assert!(overview.personal_records.is_empty());
  }

  #[tokio::test]
  async fn test_views_read_latest_history() {
    let storage = Storage::in_memory();
    let state = AppState::new(storage.clone()).await;

    seed_test_progress(&storage, "squat", 12).await;
    assert_eq!(get_volume_over_time(&state).await.unwrap().len(), 10);
    assert_eq!(get_exercise_progress(&state, "squat".to_string()).await.unwrap().len(), 12);

    storage.append_progress(&[mock_record("deadlift", 0, 500.0)]).await.unwrap();
    let records = get_personal_records(&state).await.unwrap();
    assert_eq!(records[0].record.exercise_id, "deadlift");
    assert_eq!(get_top_exercises(&state).await.unwrap()[0].exercise_id, "squat");
    assert_eq!(get_tracked_exercises(&state).await.unwrap().len(), 2);
  }
}
