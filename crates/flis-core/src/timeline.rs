//! Timeline — a named time horizon indicators are tracked against.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
  pub id:      i64,
  pub country: String,
  pub title:   String,
}

impl Timeline {
  pub fn label(&self) -> &str { &self.title }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTimeline {
  pub country: String,
  pub title:   String,
}
