use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MuscleGroup {
  Chest,
  Legs,
  Back,
  Shoulders,
  Arms,
}

impl MuscleGroup {
  pub fn as_str(&self) -> &'static str {
    match self {
      MuscleGroup::Chest => "chest",
      MuscleGroup::Legs => "legs",
      MuscleGroup::Back => "back",
      MuscleGroup::Shoulders => "shoulders",
      MuscleGroup::Arms => "arms",
    }
  }

  /// Gradient stops (from, to) used when rendering a muscle group badge
  pub fn display_color(&self) -> (&'static str, &'static str) {
    match self {
      MuscleGroup::Chest => ("#ef4444", "#ec4899"),
      MuscleGroup::Legs => ("#a855f7", "#6366f1"),
      MuscleGroup::Back => ("#3b82f6", "#06b6d4"),
      MuscleGroup::Shoulders => ("#eab308", "#f97316"),
      MuscleGroup::Arms => ("#22c55e", "#14b8a6"),
    }
  }
}

impl std::fmt::Display for MuscleGroup {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Static catalog entry. Never mutated by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
  pub id: String,
  pub name: String,
  pub category: String,
  pub muscle_group: MuscleGroup,
  pub equipment: String,
  pub description: String,
}
