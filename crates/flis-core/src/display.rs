//! Display-field types consumed by the HTML renderer.
//!
//! A detail screen is a two-column table produced by walking an entity's
//! fields in declaration order. Handlers assemble the rows (resolving
//! entity references to their display labels); the web layer only renders.

/// A rendered field or cell value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
  /// Plain text; escaped by the renderer.
  Text(String),
  /// A hyperlink.
  Link { href: String, label: String },
  /// An absent optional value; rendered literally as `None`.
  Missing,
}

impl FieldValue {
  pub fn text(value: impl Into<String>) -> Self { FieldValue::Text(value.into()) }

  pub fn link(href: impl Into<String>, label: impl Into<String>) -> Self {
    FieldValue::Link { href: href.into(), label: label.into() }
  }

  /// `Text` when present, `Missing` otherwise.
  pub fn opt(value: Option<impl Into<String>>) -> Self {
    match value {
      Some(v) => FieldValue::Text(v.into()),
      None => FieldValue::Missing,
    }
  }
}

/// One row of a detail table: column header plus value.
#[derive(Debug, Clone)]
pub struct DetailRow {
  pub label: &'static str,
  pub value: FieldValue,
}

impl DetailRow {
  pub fn new(label: &'static str, value: FieldValue) -> Self {
    DetailRow { label, value }
  }
}

/// A complete detail table.
///
/// When the entity references a source, `source_url` carries that source's
/// URL and the renderer appends it as a final `URL` row.
#[derive(Debug, Clone, Default)]
pub struct DetailTable {
  pub rows:       Vec<DetailRow>,
  pub source_url: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn opt_maps_none_to_missing() {
    assert_eq!(FieldValue::opt(None::<String>), FieldValue::Missing);
    assert_eq!(FieldValue::opt(Some("x")), FieldValue::Text("x".into()));
  }
}
