//! Form payload types and validation.
//!
//! Every screen form deserialises from a urlencoded body with all fields
//! optional at the wire level (missing keys become empty strings), then
//! `validate` either produces the store-ready field set or a [`FormErrors`]
//! keyed by field name.
//!
//! All tenant forms run the shared country cross-check: the submitted
//! `country` value must equal the country the request was dispatched for,
//! read back from the request's task-local scope. A mismatch is an
//! ordinary field error, re-rendered into the form.

use std::collections::BTreeMap;

use serde::Deserialize;

use flis_core::{
  category::{Category, NewCategory},
  country::{Country, NewCountry},
  foresight::{ForesightItem, ForesightKind, NewForesightItem},
  indicator::{Indicator, NewIndicator},
  interlink::{Interlink, NewInterlink},
  scenario::{NewScenario, Scenario},
  source::{NewSource, Source},
  timeline::{NewTimeline, Timeline},
  trend::{NewTrend, Trend},
};

use crate::tenancy;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str =
  "Select a valid choice. That choice is not one of the available choices.";
pub const INVALID_URL: &str = "Enter a valid URL.";
pub const COUNTRY_MISMATCH: &str = "Country not valid";

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Validation errors grouped per field, in field-name order.
#[derive(Debug, Clone, Default)]
pub struct FormErrors {
  by_field: BTreeMap<&'static str, Vec<String>>,
}

impl FormErrors {
  pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
    self.by_field.entry(field).or_default().push(message.into());
  }

  pub fn is_empty(&self) -> bool {
    self.by_field.is_empty()
  }

  pub fn field(&self, field: &str) -> &[String] {
    self.by_field.get(field).map(Vec::as_slice).unwrap_or(&[])
  }
}

// ─── Field helpers ───────────────────────────────────────────────────────────

fn require(errors: &mut FormErrors, field: &'static str, value: &str) -> String {
  if value.is_empty() {
    errors.add(field, REQUIRED);
  }
  value.to_owned()
}

fn optional(value: &str) -> Option<String> {
  if value.is_empty() { None } else { Some(value.to_owned()) }
}

fn require_url(errors: &mut FormErrors, field: &'static str, value: &str) -> String {
  if value.is_empty() {
    errors.add(field, REQUIRED);
  } else if !(value.starts_with("http://") || value.starts_with("https://")) {
    errors.add(field, INVALID_URL);
  }
  value.to_owned()
}

/// A required reference select. The placeholder returned alongside an error
/// never reaches the store.
fn require_choice(errors: &mut FormErrors, field: &'static str, value: &str) -> i64 {
  if value.is_empty() {
    errors.add(field, REQUIRED);
    return 0;
  }
  match value.parse() {
    Ok(id) => id,
    Err(_) => {
      errors.add(field, INVALID_CHOICE);
      0
    }
  }
}

fn optional_choice(
  errors: &mut FormErrors,
  field: &'static str,
  value: &str,
) -> Option<i64> {
  if value.is_empty() {
    return None;
  }
  match value.parse() {
    Ok(id) => Some(id),
    Err(_) => {
      errors.add(field, INVALID_CHOICE);
      None
    }
  }
}

/// The cross-tenant check shared by every tenant form: the submitted
/// country must match the request's country scope. Outside a scope there
/// is nothing to match against, which is equally invalid.
pub fn clean_country(errors: &mut FormErrors, submitted: &str) {
  match tenancy::current_country() {
    Some(country) if country.iso == submitted => {}
    _ => errors.add("country", COUNTRY_MISMATCH),
  }
}

// ─── Country (management) ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CountryForm {
  pub iso:  String,
  pub name: String,
}

impl CountryForm {
  pub fn validate(&self) -> Result<NewCountry, FormErrors> {
    let mut errors = FormErrors::default();
    let iso = require(&mut errors, "iso", &self.iso);
    let name = require(&mut errors, "name", &self.name);
    if errors.is_empty() { Ok(NewCountry { iso, name }) } else { Err(errors) }
  }
}

impl From<&Country> for CountryForm {
  fn from(c: &Country) -> Self {
    CountryForm { iso: c.iso.clone(), name: c.name.clone() }
  }
}

// ─── Source ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceForm {
  pub country:             String,
  pub short_name:          String,
  pub long_name:           String,
  pub year_of_publication: String,
  pub author:              String,
  pub url:                 String,
  pub summary:             String,
}

impl SourceForm {
  pub fn validate(&self) -> Result<NewSource, FormErrors> {
    let mut errors = FormErrors::default();
    let fields = NewSource {
      country:             require(&mut errors, "country", &self.country),
      short_name:          require(&mut errors, "short_name", &self.short_name),
      long_name:           require(&mut errors, "long_name", &self.long_name),
      year_of_publication: require(
        &mut errors,
        "year_of_publication",
        &self.year_of_publication,
      ),
      author:              require(&mut errors, "author", &self.author),
      url:                 require_url(&mut errors, "url", &self.url),
      summary:             self.summary.clone(),
    };
    clean_country(&mut errors, &self.country);
    if errors.is_empty() { Ok(fields) } else { Err(errors) }
  }
}

impl From<&Source> for SourceForm {
  fn from(s: &Source) -> Self {
    SourceForm {
      country:             s.country.clone(),
      short_name:          s.short_name.clone(),
      long_name:           s.long_name.clone(),
      year_of_publication: s.year_of_publication.clone(),
      author:              s.author.clone(),
      url:                 s.url.clone(),
      summary:             s.summary.clone(),
    }
  }
}

// ─── Trend ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrendForm {
  pub country:     String,
  pub code:        String,
  pub description: String,
  pub source:      String,
  pub ownership:   String,
  pub summary:     String,
  pub file_path:   String,
}

impl TrendForm {
  pub fn validate(&self) -> Result<NewTrend, FormErrors> {
    let mut errors = FormErrors::default();
    let fields = NewTrend {
      country:     require(&mut errors, "country", &self.country),
      code:        require(&mut errors, "code", &self.code),
      description: require(&mut errors, "description", &self.description),
      source_id:   require_choice(&mut errors, "source", &self.source),
      ownership:   require(&mut errors, "ownership", &self.ownership),
      summary:     self.summary.clone(),
      file_path:   optional(&self.file_path),
    };
    clean_country(&mut errors, &self.country);
    if errors.is_empty() { Ok(fields) } else { Err(errors) }
  }
}

impl From<&Trend> for TrendForm {
  fn from(t: &Trend) -> Self {
    TrendForm {
      country:     t.country.clone(),
      code:        t.code.clone(),
      description: t.description.clone(),
      source:      t.source_id.to_string(),
      ownership:   t.ownership.clone(),
      summary:     t.summary.clone(),
      file_path:   t.file_path.clone().unwrap_or_default(),
    }
  }
}

// ─── Category ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CategoryForm {
  pub country:     String,
  pub code:        String,
  pub description: String,
}

impl CategoryForm {
  pub fn validate(&self) -> Result<NewCategory, FormErrors> {
    let mut errors = FormErrors::default();
    let fields = NewCategory {
      country:     require(&mut errors, "country", &self.country),
      code:        require(&mut errors, "code", &self.code),
      description: require(&mut errors, "description", &self.description),
    };
    clean_country(&mut errors, &self.country);
    if errors.is_empty() { Ok(fields) } else { Err(errors) }
  }
}

impl From<&Category> for CategoryForm {
  fn from(c: &Category) -> Self {
    CategoryForm {
      country:     c.country.clone(),
      code:        c.code.clone(),
      description: c.description.clone(),
    }
  }
}

// ─── Timeline ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TimelineForm {
  pub country: String,
  pub title:   String,
}

impl TimelineForm {
  pub fn validate(&self) -> Result<NewTimeline, FormErrors> {
    let mut errors = FormErrors::default();
    let fields = NewTimeline {
      country: require(&mut errors, "country", &self.country),
      title:   require(&mut errors, "title", &self.title),
    };
    clean_country(&mut errors, &self.country);
    if errors.is_empty() { Ok(fields) } else { Err(errors) }
  }
}

impl From<&Timeline> for TimelineForm {
  fn from(t: &Timeline) -> Self {
    TimelineForm { country: t.country.clone(), title: t.title.clone() }
  }
}

// ─── Scenario ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScenarioForm {
  pub country:     String,
  pub code:        String,
  pub description: String,
}

impl ScenarioForm {
  pub fn validate(&self) -> Result<NewScenario, FormErrors> {
    let mut errors = FormErrors::default();
    let fields = NewScenario {
      country:     require(&mut errors, "country", &self.country),
      code:        require(&mut errors, "code", &self.code),
      description: require(&mut errors, "description", &self.description),
    };
    clean_country(&mut errors, &self.country);
    if errors.is_empty() { Ok(fields) } else { Err(errors) }
  }
}

impl From<&Scenario> for ScenarioForm {
  fn from(s: &Scenario) -> Self {
    ScenarioForm {
      country:     s.country.clone(),
      code:        s.code.clone(),
      description: s.description.clone(),
    }
  }
}

// ─── Indicator ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IndicatorForm {
  pub country:               String,
  pub code:                  String,
  pub description:           String,
  pub thematic_category:     String,
  pub geographical_scale:    String,
  pub geographical_coverage: String,
  pub timeline:              String,
  pub source:                String,
  pub base_year:             String,
  pub end_year:              String,
  pub ownership:             String,
  pub file_path:             String,
}

impl IndicatorForm {
  pub fn validate(&self) -> Result<NewIndicator, FormErrors> {
    let mut errors = FormErrors::default();
    let fields = NewIndicator {
      country:                  require(&mut errors, "country", &self.country),
      code:                     require(&mut errors, "code", &self.code),
      description:              require(&mut errors, "description", &self.description),
      thematic_category_id:     require_choice(
        &mut errors,
        "thematic_category",
        &self.thematic_category,
      ),
      geographical_scale_id:    optional_choice(
        &mut errors,
        "geographical_scale",
        &self.geographical_scale,
      ),
      geographical_coverage_id: optional_choice(
        &mut errors,
        "geographical_coverage",
        &self.geographical_coverage,
      ),
      timeline_id:              require_choice(&mut errors, "timeline", &self.timeline),
      source_id:                require_choice(&mut errors, "source", &self.source),
      base_year:                require(&mut errors, "base_year", &self.base_year),
      end_year:                 require(&mut errors, "end_year", &self.end_year),
      ownership:                require(&mut errors, "ownership", &self.ownership),
      file_path:                optional(&self.file_path),
    };
    clean_country(&mut errors, &self.country);
    if errors.is_empty() { Ok(fields) } else { Err(errors) }
  }
}

impl From<&Indicator> for IndicatorForm {
  fn from(i: &Indicator) -> Self {
    IndicatorForm {
      country:               i.country.clone(),
      code:                  i.code.clone(),
      description:           i.description.clone(),
      thematic_category:     i.thematic_category_id.to_string(),
      geographical_scale:    i
        .geographical_scale_id
        .map(|id| id.to_string())
        .unwrap_or_default(),
      geographical_coverage: i
        .geographical_coverage_id
        .map(|id| id.to_string())
        .unwrap_or_default(),
      timeline:              i.timeline_id.to_string(),
      source:                i.source_id.to_string(),
      base_year:             i.base_year.clone(),
      end_year:              i.end_year.clone(),
      ownership:             i.ownership.clone(),
      file_path:             i.file_path.clone().unwrap_or_default(),
    }
  }
}

// ─── Foresight item ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ForesightForm {
  pub country:        String,
  pub code:           String,
  pub steep_category: String,
  pub description:    String,
  pub source:         String,
  pub url:            String,
  pub ownership:      String,
  pub summary:        String,
  pub file_path:      String,
}

impl ForesightForm {
  /// The URL field only exists for kinds that require one; for the others
  /// any submitted value is dropped.
  pub fn validate(&self, kind: ForesightKind) -> Result<NewForesightItem, FormErrors> {
    let mut errors = FormErrors::default();
    let url = if kind.has_url() {
      Some(require_url(&mut errors, "url", &self.url))
    } else {
      None
    };
    let fields = NewForesightItem {
      country:           require(&mut errors, "country", &self.country),
      code:              require(&mut errors, "code", &self.code),
      steep_category_id: optional_choice(
        &mut errors,
        "steep_category",
        &self.steep_category,
      ),
      description:       require(&mut errors, "description", &self.description),
      source_id:         require_choice(&mut errors, "source", &self.source),
      url,
      ownership:         require(&mut errors, "ownership", &self.ownership),
      summary:           self.summary.clone(),
      file_path:         optional(&self.file_path),
    };
    clean_country(&mut errors, &self.country);
    if errors.is_empty() { Ok(fields) } else { Err(errors) }
  }
}

impl From<&ForesightItem> for ForesightForm {
  fn from(item: &ForesightItem) -> Self {
    ForesightForm {
      country:        item.country.clone(),
      code:           item.code.clone(),
      steep_category: item
        .steep_category_id
        .map(|id| id.to_string())
        .unwrap_or_default(),
      description:    item.description.clone(),
      source:         item.source_id.to_string(),
      url:            item.url.clone().unwrap_or_default(),
      ownership:      item.ownership.clone(),
      summary:        item.summary.clone(),
      file_path:      item.file_path.clone().unwrap_or_default(),
    }
  }
}

// ─── Interlink ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InterlinkForm {
  pub country:     String,
  pub gmt:         String,
  pub trend:       String,
  pub indicator_1: String,
  pub indicator_2: String,
  pub indicator_3: String,
  pub indicator_4: String,
}

impl InterlinkForm {
  pub fn validate(&self) -> Result<NewInterlink, FormErrors> {
    let mut errors = FormErrors::default();
    let fields = NewInterlink {
      country:        require(&mut errors, "country", &self.country),
      gmt_id:         require_choice(&mut errors, "gmt", &self.gmt),
      trend_id:       require_choice(&mut errors, "trend", &self.trend),
      indicator_1_id: require_choice(&mut errors, "indicator_1", &self.indicator_1),
      indicator_2_id: optional_choice(&mut errors, "indicator_2", &self.indicator_2),
      indicator_3_id: optional_choice(&mut errors, "indicator_3", &self.indicator_3),
      indicator_4_id: optional_choice(&mut errors, "indicator_4", &self.indicator_4),
    };
    clean_country(&mut errors, &self.country);
    if errors.is_empty() { Ok(fields) } else { Err(errors) }
  }
}

impl From<&Interlink> for InterlinkForm {
  fn from(link: &Interlink) -> Self {
    InterlinkForm {
      country:     link.country.clone(),
      gmt:         link.gmt_id.to_string(),
      trend:       link.trend_id.to_string(),
      indicator_1: link.indicator_1_id.to_string(),
      indicator_2: link.indicator_2_id.map(|id| id.to_string()).unwrap_or_default(),
      indicator_3: link.indicator_3_id.map(|id| id.to_string()).unwrap_or_default(),
      indicator_4: link.indicator_4_id.map(|id| id.to_string()).unwrap_or_default(),
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tenancy::with_country;

  fn romania() -> Country {
    Country { iso: "ro".into(), name: "Romania".into() }
  }

  fn valid_source_form() -> SourceForm {
    SourceForm {
      country:             "ro".into(),
      short_name:          "EEA".into(),
      long_name:           "European Environment Agency".into(),
      year_of_publication: "2012".into(),
      author:              "EEA".into(),
      url:                 "http://example.com".into(),
      summary:             String::new(),
    }
  }

  #[tokio::test]
  async fn valid_form_in_matching_scope_passes() {
    let result =
      with_country(romania(), async { valid_source_form().validate() }).await;
    assert!(result.is_ok());
  }

  #[tokio::test]
  async fn country_mismatch_is_a_field_error() {
    let mut form = valid_source_form();
    form.country = "si".into();
    let errors =
      with_country(romania(), async move { form.validate() }).await.unwrap_err();
    assert_eq!(errors.field("country"), [COUNTRY_MISMATCH]);
  }

  #[tokio::test]
  async fn validation_outside_a_scope_rejects_the_country() {
    // No task-local country set: nothing to match against.
    let errors = valid_source_form().validate().unwrap_err();
    assert_eq!(errors.field("country"), [COUNTRY_MISMATCH]);
  }

  #[tokio::test]
  async fn missing_required_fields_are_reported_per_field() {
    let errors = with_country(romania(), async {
      SourceForm { country: "ro".into(), ..Default::default() }.validate()
    })
    .await
    .unwrap_err();

    assert_eq!(errors.field("short_name"), [REQUIRED]);
    assert_eq!(errors.field("url"), [REQUIRED]);
    assert!(errors.field("country").is_empty());
    assert!(errors.field("summary").is_empty(), "summary is optional");
  }

  #[tokio::test]
  async fn url_scheme_is_validated() {
    let mut form = valid_source_form();
    form.url = "ftp://example.com".into();
    let errors =
      with_country(romania(), async move { form.validate() }).await.unwrap_err();
    assert_eq!(errors.field("url"), [INVALID_URL]);
  }

  #[tokio::test]
  async fn reference_selects_parse_or_error() {
    let form = TrendForm {
      country:     "ro".into(),
      code:        "T1".into(),
      description: "d".into(),
      source:      "not-a-number".into(),
      ownership:   "o".into(),
      ..Default::default()
    };
    let errors =
      with_country(romania(), async move { form.validate() }).await.unwrap_err();
    assert_eq!(errors.field("source"), [INVALID_CHOICE]);
  }

  #[tokio::test]
  async fn gmt_url_is_required_but_other_kinds_drop_it() {
    let form = ForesightForm {
      country:     "ro".into(),
      code:        "G1".into(),
      description: "d".into(),
      source:      "1".into(),
      ownership:   "o".into(),
      ..Default::default()
    };

    let gmt_errors = with_country(romania(), {
      let form = form.clone();
      async move { form.validate(ForesightKind::Gmt) }
    })
    .await
    .unwrap_err();
    assert_eq!(gmt_errors.field("url"), [REQUIRED]);

    let model = with_country(romania(), async move {
      form.validate(ForesightKind::FlisModel)
    })
    .await
    .unwrap();
    assert_eq!(model.url, None);
  }

  #[tokio::test]
  async fn interlink_optional_indicators_may_be_blank() {
    let form = InterlinkForm {
      country:     "ro".into(),
      gmt:         "1".into(),
      trend:       "2".into(),
      indicator_1: "3".into(),
      ..Default::default()
    };
    let fields =
      with_country(romania(), async move { form.validate() }).await.unwrap();
    assert_eq!(fields.indicator_2_id, None);
    assert_eq!(fields.indicator_4_id, None);
  }
}
