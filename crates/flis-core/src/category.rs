//! Lookup categories: four near-identical code/description tables
//! distinguished by [`CategoryKind`].
//!
//! Each kind lives in its own table and gets its own set of screens, but
//! they share one row shape, so the store and the handlers treat them as a
//! single entity parameterised by kind.

use serde::{Deserialize, Serialize};

/// Which lookup table a [`Category`] row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
  Thematic,
  GeographicalScale,
  GeographicalCoverage,
  Steep,
}

impl CategoryKind {
  pub const ALL: [CategoryKind; 4] = [
    CategoryKind::Thematic,
    CategoryKind::GeographicalScale,
    CategoryKind::GeographicalCoverage,
    CategoryKind::Steep,
  ];

  /// URL path segment for this kind's screens.
  pub fn slug(self) -> &'static str {
    match self {
      CategoryKind::Thematic => "thematic-categories",
      CategoryKind::GeographicalScale => "geographical-scales",
      CategoryKind::GeographicalCoverage => "geographical-coverages",
      CategoryKind::Steep => "steep-categories",
    }
  }

  pub fn verbose_name(self) -> &'static str {
    match self {
      CategoryKind::Thematic => "Thematic category",
      CategoryKind::GeographicalScale => "Geographical scale",
      CategoryKind::GeographicalCoverage => "Geographical coverage",
      CategoryKind::Steep => "Steep category",
    }
  }

  pub fn verbose_name_plural(self) -> &'static str {
    match self {
      CategoryKind::Thematic => "Thematic categories",
      CategoryKind::GeographicalScale => "Geographical scales",
      CategoryKind::GeographicalCoverage => "Geographical coverages",
      CategoryKind::Steep => "Steep categories",
    }
  }
}

/// A row of one of the four lookup tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub id:          i64,
  pub country:     String,
  pub code:        String,
  pub description: String,
}

impl Category {
  /// Display label: `code (description)`, as shown in selects and links.
  pub fn label(&self) -> String {
    format!("{} ({})", self.code, self.description)
  }
}

/// Field set for inserting or updating a [`Category`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCategory {
  pub country:     String,
  pub code:        String,
  pub description: String,
}
