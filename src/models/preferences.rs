use serde::{Deserialize, Serialize};

use crate::timer::DEFAULT_REST_SECONDS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
  #[default]
  Kg,
  Lbs,
}

impl std::fmt::Display for WeightUnit {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Kg => write!(f, "kg"),
      Self::Lbs => write!(f, "lbs"),
    }
  }
}

impl std::str::FromStr for WeightUnit {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "kg" => Ok(Self::Kg),
      "lbs" | "lb" => Ok(Self::Lbs),
      _ => Err(format!("Unknown weight unit: {}", s)),
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
  #[default]
  Dark,
  Light,
}

impl std::fmt::Display for Theme {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Dark => write!(f, "dark"),
      Self::Light => write!(f, "light"),
    }
  }
}

impl std::str::FromStr for Theme {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "dark" => Ok(Self::Dark),
      "light" => Ok(Self::Light),
      _ => Err(format!("Unknown theme: {}", s)),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
  pub weight_unit: WeightUnit,
  /// Rest countdown length in seconds
  pub default_rest_time: u32,
  pub theme: Theme,
}

impl Default for UserPreferences {
  fn default() -> Self {
    Self {
      weight_unit: WeightUnit::Kg,
      default_rest_time: DEFAULT_REST_SECONDS,
      theme: Theme::Dark,
    }
  }
}
