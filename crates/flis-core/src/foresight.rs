//! Foresight items: seven near-identical entity kinds sharing one row
//! shape, distinguished by [`ForesightKind`].
//!
//! GMTs, FLIS models, horizon scannings, methods and tools, uncertainties,
//! wild cards and early warnings all carry the same code/description/
//! ownership/summary fields, an optional steep-category classification and
//! a mandatory source. Only GMTs additionally require a URL.

use serde::{Deserialize, Serialize};

/// Which foresight table a [`ForesightItem`] row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForesightKind {
  Gmt,
  FlisModel,
  HorizonScanning,
  MethodTool,
  Uncertainty,
  WildCard,
  EarlyWarning,
}

impl ForesightKind {
  pub const ALL: [ForesightKind; 7] = [
    ForesightKind::Gmt,
    ForesightKind::FlisModel,
    ForesightKind::HorizonScanning,
    ForesightKind::MethodTool,
    ForesightKind::Uncertainty,
    ForesightKind::WildCard,
    ForesightKind::EarlyWarning,
  ];

  /// URL path segment for this kind's screens.
  pub fn slug(self) -> &'static str {
    match self {
      ForesightKind::Gmt => "gmts",
      ForesightKind::FlisModel => "flis-models",
      ForesightKind::HorizonScanning => "horizon-scannings",
      ForesightKind::MethodTool => "methods-tools",
      ForesightKind::Uncertainty => "uncertainties",
      ForesightKind::WildCard => "wild-cards",
      ForesightKind::EarlyWarning => "early-warnings",
    }
  }

  pub fn verbose_name(self) -> &'static str {
    match self {
      ForesightKind::Gmt => "GMT",
      ForesightKind::FlisModel => "FLIS model",
      ForesightKind::HorizonScanning => "Horizon scanning",
      ForesightKind::MethodTool => "Method or tool",
      ForesightKind::Uncertainty => "Uncertainty",
      ForesightKind::WildCard => "Wild card",
      ForesightKind::EarlyWarning => "Early warning",
    }
  }

  pub fn verbose_name_plural(self) -> &'static str {
    match self {
      ForesightKind::Gmt => "GMTs",
      ForesightKind::FlisModel => "FLIS models",
      ForesightKind::HorizonScanning => "Horizon scannings",
      ForesightKind::MethodTool => "Methods and tools",
      ForesightKind::Uncertainty => "Uncertainties",
      ForesightKind::WildCard => "Wild cards",
      ForesightKind::EarlyWarning => "Early warnings",
    }
  }

  /// Whether items of this kind carry a mandatory URL field.
  pub fn has_url(self) -> bool { matches!(self, ForesightKind::Gmt) }
}

/// A row of one of the seven foresight tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForesightItem {
  pub id:                i64,
  pub country:           String,
  pub kind:              ForesightKind,
  pub code:              String,
  pub steep_category_id: Option<i64>,
  pub description:       String,
  pub source_id:         i64,
  /// Set only for kinds where [`ForesightKind::has_url`] holds.
  pub url:               Option<String>,
  pub ownership:         String,
  pub summary:           String,
  pub file_path:         Option<String>,
}

impl ForesightItem {
  /// Display label (the code).
  pub fn label(&self) -> &str { &self.code }
}

/// Field set for inserting or updating a [`ForesightItem`]. The kind is
/// passed alongside, not stored in the field set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewForesightItem {
  pub country:           String,
  pub code:              String,
  pub steep_category_id: Option<i64>,
  pub description:       String,
  pub source_id:         i64,
  pub url:               Option<String>,
  pub ownership:         String,
  pub summary:           String,
  pub file_path:         Option<String>,
}
