//! Indicator — a measured quantity, classified against the lookup tables
//! and backed by a [`Source`](crate::source::Source).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
  pub id:                       i64,
  pub country:                  String,
  pub code:                     String,
  pub description:              String,
  pub thematic_category_id:     i64,
  pub geographical_scale_id:    Option<i64>,
  pub geographical_coverage_id: Option<i64>,
  pub timeline_id:              i64,
  pub source_id:                i64,
  pub base_year:                String,
  pub end_year:                 String,
  pub ownership:                String,
  pub file_path:                Option<String>,
}

impl Indicator {
  /// Display label (the code).
  pub fn label(&self) -> &str { &self.code }
}

/// Field set for inserting or updating an [`Indicator`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewIndicator {
  pub country:                  String,
  pub code:                     String,
  pub description:              String,
  pub thematic_category_id:     i64,
  pub geographical_scale_id:    Option<i64>,
  pub geographical_coverage_id: Option<i64>,
  pub timeline_id:              i64,
  pub source_id:                i64,
  pub base_year:                String,
  pub end_year:                 String,
  pub ownership:                String,
  pub file_path:                Option<String>,
}
