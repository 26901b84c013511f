//! Source — a published document that other catalogue entries cite.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
  pub id:                  i64,
  pub country:             String,
  pub short_name:          String,
  pub long_name:           String,
  pub year_of_publication: String,
  pub author:              String,
  pub url:                 String,
  pub summary:             String,
}

impl Source {
  /// Display label (the short name).
  pub fn label(&self) -> &str { &self.short_name }
}

/// Field set for inserting or updating a [`Source`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSource {
  pub country:             String,
  pub short_name:          String,
  pub long_name:           String,
  pub year_of_publication: String,
  pub author:              String,
  pub url:                 String,
  pub summary:             String,
}
