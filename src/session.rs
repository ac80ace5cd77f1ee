//! Workout Session State Machine
//!
//! Owns the single active workout. States:
//! - Idle: nothing in progress
//! - Active: one workout being logged, mutable
//!
//! Transitions back to Idle happen through `finish` (history and progress
//! are written) or `cancel` (the workout is discarded).
//!
//! Every mutation clones the active workout, applies the change to the
//! copy, persists the whole snapshot and only then swaps it in. A failed
//! write leaves the in-memory state untouched.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::analysis::one_rep_max;
use crate::models::{Exercise, ProgressData, Workout, WorkoutExercise, WorkoutSet};
use crate::storage::{Storage, StorageError};

pub const DEFAULT_WORKOUT_NAME: &str = "New Workout";

// ---------------------------------------------------------------------------
/// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No exercise at index {index} (workout has {len})")]
    ExerciseIndex { index: usize, len: usize },

    #[error("No set at index {index} for exercise {exercise} (exercise has {len})")]
    SetIndex {
        exercise: usize,
        index: usize,
        len: usize,
    },

    #[error("Invalid weight: {0}")]
    InvalidWeight(f64),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type SessionResult<T> = Result<T, SessionError>;

// ---------------------------------------------------------------------------
/// Session State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Active(Workout),
}

/// Numeric set field edits, applied together
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SetUpdate {
    pub reps: Option<u32>,
    pub weight: Option<f64>,
}

impl SetUpdate {
    pub fn reps(reps: u32) -> Self {
        Self {
            reps: Some(reps),
            ..Self::default()
        }
    }

    pub fn weight(weight: f64) -> Self {
        Self {
            weight: Some(weight),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reps.is_none() && self.weight.is_none()
    }
}

/// Result of finishing a workout
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedWorkout {
    pub workout: Workout,
    pub progress: Vec<ProgressData>,
}

pub struct WorkoutSession {
    storage: Storage,
    state: SessionState,
}

impl WorkoutSession {
    /// Resume whatever workout was in progress when the store was last written
    pub async fn restore(storage: Storage) -> Self {
        let state = match storage.current_workout().await {
            Some(workout) => {
                info!(workout_id = %workout.id, name = %workout.name, "Resumed active workout");
                SessionState::Active(workout)
            }
            None => SessionState::Idle,
        };
        Self { storage, state }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active(_))
    }

    pub fn current(&self) -> Option<&Workout> {
        match &self.state {
            SessionState::Active(workout) => Some(workout),
            SessionState::Idle => None,
        }
    }

    /// Seconds since the active workout started
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> Option<i64> {
        self.current()
            .map(|w| (now - w.started_at).num_seconds().max(0))
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    pub async fn start(&mut self, name: &str) -> SessionResult<bool> {
        self.start_at(name, Utc::now()).await
    }

    /// No-op when a workout is already active
    pub async fn start_at(&mut self, name: &str, started_at: DateTime<Utc>) -> SessionResult<bool> {
        if self.is_active() {
            debug!("Start ignored, a workout is already active");
            return Ok(false);
        }

        let workout = Workout::begin(name, started_at);
        self.storage.save_current_workout(Some(&workout)).await?;
        info!(workout_id = %workout.id, name, "Workout started");
        self.state = SessionState::Active(workout);
        Ok(true)
    }

    pub async fn finish(&mut self) -> SessionResult<Option<FinishedWorkout>> {
        self.finish_at(Utc::now()).await
    }

    /// Write the workout to history, emit one progress entry per completed
    /// set and return to Idle. No-op when Idle. The history write is atomic,
    /// so a failed finish stays Active and can be retried safely.
    pub async fn finish_at(&mut self, finished_at: DateTime<Utc>) -> SessionResult<Option<FinishedWorkout>> {
        let current = match &self.state {
            SessionState::Active(workout) => workout,
            SessionState::Idle => return Ok(None),
        };

        let mut workout = current.clone();
        workout.total_volume = workout.completed_volume();
        workout.duration_seconds = (finished_at - workout.started_at).num_seconds().max(0);
        workout.completed = true;

        let progress = progress_entries(&workout);

        self.storage.record_finished(&workout, &progress).await?;

        info!(
            workout_id = %workout.id,
            total_volume = workout.total_volume,
            duration_seconds = workout.duration_seconds,
            progress_entries = progress.len(),
            "Workout finished"
        );
        self.state = SessionState::Idle;
        Ok(Some(FinishedWorkout { workout, progress }))
    }

    /// Discard the active workout without recording it. No-op when Idle.
    pub async fn cancel(&mut self) -> SessionResult<bool> {
        let workout_id = match &self.state {
            SessionState::Active(workout) => workout.id.clone(),
            SessionState::Idle => return Ok(false),
        };

        self.storage.save_current_workout(None).await?;
        info!(workout_id = %workout_id, "Workout cancelled");
        self.state = SessionState::Idle;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Edits
    // -----------------------------------------------------------------------

    /// Append a catalog exercise seeded with one empty set
    pub async fn add_exercise(&mut self, exercise: &Exercise) -> SessionResult<bool> {
        self.mutate(|workout| {
            workout.exercises.push(WorkoutExercise::from_catalog(exercise));
            debug!(exercise_id = %exercise.id, "Exercise added");
            Ok(())
        })
        .await
    }

    pub async fn update_set(
        &mut self,
        exercise_index: usize,
        set_index: usize,
        update: SetUpdate,
    ) -> SessionResult<bool> {
        if let Some(weight) = update.weight {
            if !weight.is_finite() || weight < 0.0 {
                return Err(SessionError::InvalidWeight(weight));
            }
        }

        self.mutate(|workout| {
            let set = set_mut(workout, exercise_index, set_index)?;
            if let Some(reps) = update.reps {
                set.reps = reps;
            }
            if let Some(weight) = update.weight {
                set.weight = weight;
            }
            Ok(())
        })
        .await
    }

    /// Mark a set done. Completing an already completed set changes nothing.
    pub async fn complete_set(&mut self, exercise_index: usize, set_index: usize) -> SessionResult<bool> {
        self.mutate(|workout| {
            set_mut(workout, exercise_index, set_index)?.completed = true;
            Ok(())
        })
        .await
    }

    /// Append a set that repeats the reps and weight of the last one
    pub async fn add_set(&mut self, exercise_index: usize) -> SessionResult<bool> {
        self.mutate(|workout| {
            let exercise = exercise_mut(workout, exercise_index)?;
            let next = exercise
                .sets
                .last()
                .map(|last| WorkoutSet::new(last.reps, last.weight))
                .unwrap_or_default();
            exercise.sets.push(next);
            Ok(())
        })
        .await
    }

    /// Remove a set by position; later sets shift down.
    /// The exercise stays in the workout even with no sets left.
    pub async fn remove_set(&mut self, exercise_index: usize, set_index: usize) -> SessionResult<bool> {
        self.mutate(|workout| {
            let exercise = exercise_mut(workout, exercise_index)?;
            let len = exercise.sets.len();
            if set_index >= len {
                return Err(SessionError::SetIndex {
                    exercise: exercise_index,
                    index: set_index,
                    len,
                });
            }
            exercise.sets.remove(set_index);
            Ok(())
        })
        .await
    }

    /// Apply `edit` to a copy of the active workout, persist, then commit.
    /// Returns `Ok(false)` when Idle.
    async fn mutate<F>(&mut self, edit: F) -> SessionResult<bool>
    where
        F: FnOnce(&mut Workout) -> SessionResult<()>,
    {
        let current = match &self.state {
            SessionState::Active(workout) => workout,
            SessionState::Idle => {
                debug!("Edit ignored, no active workout");
                return Ok(false);
            }
        };

        let mut next = current.clone();
        edit(&mut next)?;
        self.storage.save_current_workout(Some(&next)).await?;
        self.state = SessionState::Active(next);
        Ok(true)
    }
}

fn exercise_mut(workout: &mut Workout, index: usize) -> SessionResult<&mut WorkoutExercise> {
    let len = workout.exercises.len();
    workout
        .exercises
        .get_mut(index)
        .ok_or(SessionError::ExerciseIndex { index, len })
}

fn set_mut(workout: &mut Workout, exercise_index: usize, set_index: usize) -> SessionResult<&mut WorkoutSet> {
    let exercise = exercise_mut(workout, exercise_index)?;
    let len = exercise.sets.len();
    exercise.sets.get_mut(set_index).ok_or(SessionError::SetIndex {
        exercise: exercise_index,
        index: set_index,
        len,
    })
}

/// One progress entry per completed set, in workout order
fn progress_entries(workout: &Workout) -> Vec<ProgressData> {
    workout
        .exercises
        .iter()
        .flat_map(|exercise| {
            exercise.completed_sets().map(move |set| {
                let estimate = one_rep_max(set.weight, set.reps).unwrap_or_else(|e| {
                    warn!(
                        exercise_id = %exercise.exercise_id,
                        reps = set.reps,
                        error = %e,
                        "One-rep-max undefined, recording lifted weight"
                    );
                    set.weight
                });
                ProgressData {
                    date: workout.started_at,
                    exercise_id: exercise.exercise_id.clone(),
                    weight: set.weight,
                    reps: set.reps,
                    volume: set.volume(),
                    one_rep_max: estimate,
                }
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
