//! Trend — an observed development, backed by a [`Source`](crate::source::Source).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trend {
  pub id:          i64,
  pub country:     String,
  pub code:        String,
  pub description: String,
  pub source_id:   i64,
  pub ownership:   String,
  pub summary:     String,
  /// Server-relative path of an uploaded attachment, if any.
  pub file_path:   Option<String>,
}

impl Trend {
  /// Display label (the description).
  pub fn label(&self) -> &str { &self.description }
}

/// Field set for inserting or updating a [`Trend`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTrend {
  pub country:     String,
  pub code:        String,
  pub description: String,
  pub source_id:   i64,
  pub ownership:   String,
  pub summary:     String,
  pub file_path:   Option<String>,
}
