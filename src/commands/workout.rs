//! Commands for the active workout session

use crate::catalog::find_exercise;
use crate::db::AppState;
use crate::models::Workout;
use crate::session::{FinishedWorkout, SetUpdate, DEFAULT_WORKOUT_NAME};

/// Start a workout. Returns false if one is already in progress.
pub async fn start_workout(state: &AppState, name: Option<String>) -> Result<bool, String> {
    let name = name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_WORKOUT_NAME.to_string());
    let mut session = state.session.lock().await;
    session
        .start(&name)
        .await
        .map_err(|e| format!("Failed to start workout: {}", e))
}

/// Add a catalog exercise to the active workout by id
pub async fn add_exercise(state: &AppState, exercise_id: String) -> Result<bool, String> {
    let exercise =
        find_exercise(&exercise_id).ok_or_else(|| format!("Unknown exercise: {}", exercise_id))?;
    let mut session = state.session.lock().await;
    session
        .add_exercise(exercise)
        .await
        .map_err(|e| format!("Failed to add exercise: {}", e))
}

/// Apply reps and/or weight to one set
pub async fn update_set(
    state: &AppState,
    exercise_index: usize,
    set_index: usize,
    reps: Option<u32>,
    weight: Option<f64>,
) -> Result<bool, String> {
    let update = SetUpdate { reps, weight };
    if update.is_empty() {
        return Ok(false);
    }
    let mut session = state.session.lock().await;
    session
        .update_set(exercise_index, set_index, update)
        .await
        .map_err(|e| format!("Failed to update set: {}", e))
}

pub async fn complete_set(state: &AppState, exercise_index: usize, set_index: usize) -> Result<bool, String> {
    let mut session = state.session.lock().await;
    session
        .complete_set(exercise_index, set_index)
        .await
        .map_err(|e| format!("Failed to complete set: {}", e))
}

pub async fn add_set(state: &AppState, exercise_index: usize) -> Result<bool, String> {
    let mut session = state.session.lock().await;
    session
        .add_set(exercise_index)
        .await
        .map_err(|e| format!("Failed to add set: {}", e))
}

pub async fn remove_set(state: &AppState, exercise_index: usize, set_index: usize) -> Result<bool, String> {
    let mut session = state.session.lock().await;
    session
        .remove_set(exercise_index, set_index)
        .await
        .map_err(|e| format!("Failed to remove set: {}", e))
}

pub async fn finish_workout(state: &AppState) -> Result<Option<FinishedWorkout>, String> {
    let mut session = state.session.lock().await;
    session
        .finish()
        .await
        .map_err(|e| format!("Failed to finish workout: {}", e))
}

pub async fn cancel_workout(state: &AppState) -> Result<bool, String> {
    let mut session = state.session.lock().await;
    session
        .cancel()
        .await
        .map_err(|e| format!("Failed to cancel workout: {}", e))
}

pub async fn get_current_workout(state: &AppState) -> Result<Option<Workout>, String> {
    let session = state.session.lock().await;
    Ok(session.current().cloned())
}
