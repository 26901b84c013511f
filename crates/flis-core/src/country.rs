//! Country — the tenant and unit of data isolation.
//!
//! Every scoped entity carries the ISO code of the country it belongs to,
//! and every scoped URL starts with that code. Countries themselves are
//! managed outside tenant scope.

use serde::{Deserialize, Serialize};

/// A tenant. `iso` is the primary key and the leading path segment of all
/// tenant-scoped URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
  pub iso:  String,
  pub name: String,
}

impl Country {
  /// Display label (the ISO code, as in selects and breadcrumbs).
  pub fn label(&self) -> &str { &self.iso }
}

/// Field set for creating a [`Country`]. The ISO code is caller-supplied,
/// not generated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCountry {
  pub iso:  String,
  pub name: String,
}
