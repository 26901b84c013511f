//! Scenario — a coded what-if storyline tracked per country.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
  pub id:          i64,
  pub country:     String,
  pub code:        String,
  pub description: String,
}

impl Scenario {
  /// Display label: `code (description)`.
  pub fn label(&self) -> String {
    format!("{} ({})", self.code, self.description)
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewScenario {
  pub country:     String,
  pub code:        String,
  pub description: String,
}
