pub mod exercise;
pub mod preferences;
pub mod progress;
pub mod workout;

pub use exercise::{Exercise, MuscleGroup};
pub use preferences::{Theme, UserPreferences, WeightUnit};
pub use progress::ProgressData;
pub use workout::{Workout, WorkoutExercise, WorkoutSet};
