//! Static exercise library
//!
//! The catalog is fixed at build time and keyed by exercise id. Workouts
//! embed a copy of the entry they reference, so history stays readable
//! even if an entry is later renamed.

use std::sync::LazyLock;

use crate::models::{Exercise, MuscleGroup};

// (id, name, category, muscle group, equipment, description)
const CATALOG: &[(&str, &str, &str, MuscleGroup, &str, &str)] = &[
  // Chest
  ("bench-press", "Bench Press", "Chest", MuscleGroup::Chest, "Barbell", "Classic chest exercise using a barbell"),
  ("incline-bench-press", "Incline Bench Press", "Chest", MuscleGroup::Chest, "Barbell", "Upper chest focused bench press"),
  ("dumbbell-flyes", "Dumbbell Flyes", "Chest", MuscleGroup::Chest, "Dumbbells", "Chest isolation exercise with dumbbells"),
  ("push-ups", "Push-ups", "Chest", MuscleGroup::Chest, "Bodyweight", "Bodyweight chest exercise"),
  // Legs
  ("squat", "Squat", "Legs", MuscleGroup::Legs, "Barbell", "Compound leg exercise targeting quads, glutes, and hamstrings"),
  ("deadlift", "Deadlift", "Legs", MuscleGroup::Legs, "Barbell", "Full body compound movement"),
  ("leg-press", "Leg Press", "Legs", MuscleGroup::Legs, "Machine", "Machine-based leg exercise"),
  ("lunges", "Lunges", "Legs", MuscleGroup::Legs, "Dumbbells", "Unilateral leg exercise"),
  // Back
  ("pull-ups", "Pull-ups", "Back", MuscleGroup::Back, "Bodyweight", "Upper body pulling exercise"),
  ("barbell-rows", "Barbell Rows", "Back", MuscleGroup::Back, "Barbell", "Compound back exercise"),
  ("lat-pulldowns", "Lat Pulldowns", "Back", MuscleGroup::Back, "Machine", "Latissimus dorsi focused exercise"),
  // Shoulders
  ("overhead-press", "Overhead Press", "Shoulders", MuscleGroup::Shoulders, "Barbell", "Compound shoulder exercise"),
  ("lateral-raises", "Lateral Raises", "Shoulders", MuscleGroup::Shoulders, "Dumbbells", "Shoulder isolation exercise"),
  // Arms
  ("bicep-curls", "Bicep Curls", "Arms", MuscleGroup::Arms, "Dumbbells", "Bicep isolation exercise"),
  ("tricep-dips", "Tricep Dips", "Arms", MuscleGroup::Arms, "Bodyweight", "Tricep bodyweight exercise"),
];

static EXERCISES: LazyLock<Vec<Exercise>> = LazyLock::new(|| {
  CATALOG
    .iter()
    .map(|&(id, name, category, muscle_group, equipment, description)| Exercise {
      id: id.to_string(),
      name: name.to_string(),
      category: category.to_string(),
      muscle_group,
      equipment: equipment.to_string(),
      description: description.to_string(),
    })
    .collect()
});

/// All catalog entries in display order
pub fn exercises() -> &'static [Exercise] {
  &EXERCISES
}

pub fn find_exercise(id: &str) -> Option<&'static Exercise> {
  EXERCISES.iter().find(|e| e.id == id)
}

/// Display name for an exercise id, falling back to the raw id
pub fn exercise_name(id: &str) -> String {
  find_exercise(id)
    .map(|e| e.name.clone())
    .unwrap_or_else(|| id.to_string())
}

/// Distinct categories, in the order they first appear in the catalog
pub fn categories() -> Vec<&'static str> {
  let mut seen: Vec<&'static str> = Vec::new();
  for exercise in EXERCISES.iter() {
    if !seen.contains(&exercise.category.as_str()) {
      seen.push(exercise.category.as_str());
    }
  }
  seen
}

/// Case-insensitive match on name or category, optionally restricted to one category
pub fn search(term: &str, category: Option<&str>) -> Vec<&'static Exercise> {
  let needle = term.trim().to_lowercase();
  EXERCISES
    .iter()
    .filter(|e| {
      needle.is_empty()
        || e.name.to_lowercase().contains(&needle)
        || e.category.to_lowercase().contains(&needle)
    })
    .filter(|e| category.map_or(true, |c| e.category == c))
    .collect()
}
