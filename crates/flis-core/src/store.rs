//! The `FlisStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `flis-store-sqlite`).
//! The web layer depends on this abstraction, not on any concrete backend.
//!
//! Every read, update and delete of a tenant entity takes the owning
//! country; a row belonging to another tenant is indistinguishable from a
//! row that does not exist.

use std::future::Future;

use crate::{
  category::{Category, CategoryKind, NewCategory},
  country::{Country, NewCountry},
  foresight::{ForesightItem, ForesightKind, NewForesightItem},
  indicator::{Indicator, NewIndicator},
  interlink::{Interlink, NewInterlink},
  scenario::{NewScenario, Scenario},
  source::{NewSource, Source},
  timeline::{NewTimeline, Timeline},
  trend::{NewTrend, Trend},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Windowing for list queries. The default returns everything, which is how
/// the form selects and the unpaginated list screens read their rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
  pub limit:  Option<usize>,
  pub offset: usize,
}

impl ListQuery {
  /// A window of `limit` rows starting at `offset`.
  pub fn window(limit: usize, offset: usize) -> Self {
    ListQuery { limit: Some(limit), offset }
  }
}

/// Result of a delete operation.
///
/// `Protected` reports a row that is still referenced through a protected
/// foreign key and was therefore left in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
  Deleted,
  NotFound,
  Protected,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a FLIS catalogue backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait FlisStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Countries (unscoped) ──────────────────────────────────────────────

  /// Persist a new country. Returns `false` when the ISO code is taken.
  fn add_country(
    &self,
    country: NewCountry,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn get_country<'a>(
    &'a self,
    iso: &'a str,
  ) -> impl Future<Output = Result<Option<Country>, Self::Error>> + Send + 'a;

  fn list_countries(
    &self,
  ) -> impl Future<Output = Result<Vec<Country>, Self::Error>> + Send + '_;

  /// Rename a country. Returns `false` when the ISO code is unknown.
  fn update_country<'a>(
    &'a self,
    iso: &'a str,
    name: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Delete a country and, through cascading references, all of its data.
  fn delete_country<'a>(
    &'a self,
    iso: &'a str,
  ) -> impl Future<Output = Result<DeleteOutcome, Self::Error>> + Send + 'a;

  // ── Sources ───────────────────────────────────────────────────────────

  fn add_source(
    &self,
    source: NewSource,
  ) -> impl Future<Output = Result<Source, Self::Error>> + Send + '_;

  fn get_source<'a>(
    &'a self,
    country: &'a str,
    id: i64,
  ) -> impl Future<Output = Result<Option<Source>, Self::Error>> + Send + 'a;

  fn list_sources<'a>(
    &'a self,
    country: &'a str,
    query: ListQuery,
  ) -> impl Future<Output = Result<Vec<Source>, Self::Error>> + Send + 'a;

  fn count_sources<'a>(
    &'a self,
    country: &'a str,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  /// Returns `false` when no row matched the country/id pair.
  fn update_source<'a>(
    &'a self,
    country: &'a str,
    id: i64,
    fields: NewSource,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn delete_source<'a>(
    &'a self,
    country: &'a str,
    id: i64,
  ) -> impl Future<Output = Result<DeleteOutcome, Self::Error>> + Send + 'a;

  // ── Trends ────────────────────────────────────────────────────────────

  fn add_trend(
    &self,
    trend: NewTrend,
  ) -> impl Future<Output = Result<Trend, Self::Error>> + Send + '_;

  fn get_trend<'a>(
    &'a self,
    country: &'a str,
    id: i64,
  ) -> impl Future<Output = Result<Option<Trend>, Self::Error>> + Send + 'a;

  fn list_trends<'a>(
    &'a self,
    country: &'a str,
    query: ListQuery,
  ) -> impl Future<Output = Result<Vec<Trend>, Self::Error>> + Send + 'a;

  fn count_trends<'a>(
    &'a self,
    country: &'a str,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  fn update_trend<'a>(
    &'a self,
    country: &'a str,
    id: i64,
    fields: NewTrend,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn delete_trend<'a>(
    &'a self,
    country: &'a str,
    id: i64,
  ) -> impl Future<Output = Result<DeleteOutcome, Self::Error>> + Send + 'a;

  // ── Categories (kind-selected lookup tables) ──────────────────────────

  fn add_category(
    &self,
    kind: CategoryKind,
    category: NewCategory,
  ) -> impl Future<Output = Result<Category, Self::Error>> + Send + '_;

  fn get_category<'a>(
    &'a self,
    kind: CategoryKind,
    country: &'a str,
    id: i64,
  ) -> impl Future<Output = Result<Option<Category>, Self::Error>> + Send + 'a;

  fn list_categories<'a>(
    &'a self,
    kind: CategoryKind,
    country: &'a str,
  ) -> impl Future<Output = Result<Vec<Category>, Self::Error>> + Send + 'a;

  fn update_category<'a>(
    &'a self,
    kind: CategoryKind,
    country: &'a str,
    id: i64,
    fields: NewCategory,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn delete_category<'a>(
    &'a self,
    kind: CategoryKind,
    country: &'a str,
    id: i64,
  ) -> impl Future<Output = Result<DeleteOutcome, Self::Error>> + Send + 'a;

  // ── Timelines ─────────────────────────────────────────────────────────

  fn add_timeline(
    &self,
    timeline: NewTimeline,
  ) -> impl Future<Output = Result<Timeline, Self::Error>> + Send + '_;

  fn get_timeline<'a>(
    &'a self,
    country: &'a str,
    id: i64,
  ) -> impl Future<Output = Result<Option<Timeline>, Self::Error>> + Send + 'a;

  fn list_timelines<'a>(
    &'a self,
    country: &'a str,
  ) -> impl Future<Output = Result<Vec<Timeline>, Self::Error>> + Send + 'a;

  fn update_timeline<'a>(
    &'a self,
    country: &'a str,
    id: i64,
    fields: NewTimeline,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn delete_timeline<'a>(
    &'a self,
    country: &'a str,
    id: i64,
  ) -> impl Future<Output = Result<DeleteOutcome, Self::Error>> + Send + 'a;

  // ── Scenarios ─────────────────────────────────────────────────────────

  fn add_scenario(
    &self,
    scenario: NewScenario,
  ) -> impl Future<Output = Result<Scenario, Self::Error>> + Send + '_;

  fn get_scenario<'a>(
    &'a self,
    country: &'a str,
    id: i64,
  ) -> impl Future<Output = Result<Option<Scenario>, Self::Error>> + Send + 'a;

  fn list_scenarios<'a>(
    &'a self,
    country: &'a str,
  ) -> impl Future<Output = Result<Vec<Scenario>, Self::Error>> + Send + 'a;

  fn update_scenario<'a>(
    &'a self,
    country: &'a str,
    id: i64,
    fields: NewScenario,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn delete_scenario<'a>(
    &'a self,
    country: &'a str,
    id: i64,
  ) -> impl Future<Output = Result<DeleteOutcome, Self::Error>> + Send + 'a;

  // ── Indicators ────────────────────────────────────────────────────────

  fn add_indicator(
    &self,
    indicator: NewIndicator,
  ) -> impl Future<Output = Result<Indicator, Self::Error>> + Send + '_;

  fn get_indicator<'a>(
    &'a self,
    country: &'a str,
    id: i64,
  ) -> impl Future<Output = Result<Option<Indicator>, Self::Error>> + Send + 'a;

  fn list_indicators<'a>(
    &'a self,
    country: &'a str,
  ) -> impl Future<Output = Result<Vec<Indicator>, Self::Error>> + Send + 'a;

  fn update_indicator<'a>(
    &'a self,
    country: &'a str,
    id: i64,
    fields: NewIndicator,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn delete_indicator<'a>(
    &'a self,
    country: &'a str,
    id: i64,
  ) -> impl Future<Output = Result<DeleteOutcome, Self::Error>> + Send + 'a;

  // ── Foresight items (kind-selected tables) ────────────────────────────

  fn add_foresight(
    &self,
    kind: ForesightKind,
    item: NewForesightItem,
  ) -> impl Future<Output = Result<ForesightItem, Self::Error>> + Send + '_;

  fn get_foresight<'a>(
    &'a self,
    kind: ForesightKind,
    country: &'a str,
    id: i64,
  ) -> impl Future<Output = Result<Option<ForesightItem>, Self::Error>> + Send + 'a;

  fn list_foresight<'a>(
    &'a self,
    kind: ForesightKind,
    country: &'a str,
    query: ListQuery,
  ) -> impl Future<Output = Result<Vec<ForesightItem>, Self::Error>> + Send + 'a;

  fn count_foresight<'a>(
    &'a self,
    kind: ForesightKind,
    country: &'a str,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  fn update_foresight<'a>(
    &'a self,
    kind: ForesightKind,
    country: &'a str,
    id: i64,
    fields: NewForesightItem,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn delete_foresight<'a>(
    &'a self,
    kind: ForesightKind,
    country: &'a str,
    id: i64,
  ) -> impl Future<Output = Result<DeleteOutcome, Self::Error>> + Send + 'a;

  // ── Interlinks ────────────────────────────────────────────────────────

  fn add_interlink(
    &self,
    interlink: NewInterlink,
  ) -> impl Future<Output = Result<Interlink, Self::Error>> + Send + '_;

  fn get_interlink<'a>(
    &'a self,
    country: &'a str,
    id: i64,
  ) -> impl Future<Output = Result<Option<Interlink>, Self::Error>> + Send + 'a;

  fn list_interlinks<'a>(
    &'a self,
    country: &'a str,
    query: ListQuery,
  ) -> impl Future<Output = Result<Vec<Interlink>, Self::Error>> + Send + 'a;

  fn count_interlinks<'a>(
    &'a self,
    country: &'a str,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  fn update_interlink<'a>(
    &'a self,
    country: &'a str,
    id: i64,
    fields: NewInterlink,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn delete_interlink<'a>(
    &'a self,
    country: &'a str,
    id: i64,
  ) -> impl Future<Output = Result<DeleteOutcome, Self::Error>> + Send + 'a;
}
