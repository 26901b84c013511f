//! Integration tests for `SqliteStore` against an in-memory database.

use flis_core::{
  category::{CategoryKind, NewCategory},
  country::NewCountry,
  foresight::{ForesightKind, NewForesightItem},
  indicator::NewIndicator,
  interlink::NewInterlink,
  source::NewSource,
  store::{DeleteOutcome, FlisStore, ListQuery},
  timeline::NewTimeline,
  trend::NewTrend,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn seed_country(s: &SqliteStore, iso: &str) {
  let created = s
    .add_country(NewCountry { iso: iso.into(), name: format!("Country {iso}") })
    .await
    .unwrap();
  assert!(created, "country {iso} already seeded");
}

fn new_source(country: &str) -> NewSource {
  NewSource {
    country:             country.into(),
    short_name:          "EEA".into(),
    long_name:           "European Environment Agency".into(),
    year_of_publication: "2012".into(),
    author:              "EEA".into(),
    url:                 "http://example.com/report".into(),
    summary:             String::new(),
  }
}

fn new_trend(country: &str, source_id: i64) -> NewTrend {
  NewTrend {
    country:     country.into(),
    code:        "T1".into(),
    description: "Urbanisation".into(),
    source_id,
    ownership:   "public".into(),
    summary:     String::new(),
    file_path:   None,
  }
}

fn new_foresight(country: &str, source_id: i64) -> NewForesightItem {
  NewForesightItem {
    country:           country.into(),
    code:              "F1".into(),
    steep_category_id: None,
    description:       "description".into(),
    source_id,
    url:               None,
    ownership:         "public".into(),
    summary:           String::new(),
    file_path:         None,
  }
}

// ─── Countries ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_country() {
  let s = store().await;
  seed_country(&s, "ro").await;

  let ro = s.get_country("ro").await.unwrap();
  assert!(ro.is_some());
  assert_eq!(ro.unwrap().name, "Country ro");

  assert!(s.get_country("xx").await.unwrap().is_none());
}

#[tokio::test]
async fn add_country_duplicate_iso_is_rejected() {
  let s = store().await;
  seed_country(&s, "ro").await;

  let created = s
    .add_country(NewCountry { iso: "ro".into(), name: "Again".into() })
    .await
    .unwrap();
  assert!(!created);
}

#[tokio::test]
async fn list_countries_is_sorted_by_iso() {
  let s = store().await;
  seed_country(&s, "si").await;
  seed_country(&s, "at").await;
  seed_country(&s, "ro").await;

  let isos: Vec<String> = s
    .list_countries()
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.iso)
    .collect();
  assert_eq!(isos, ["at", "ro", "si"]);
}

#[tokio::test]
async fn update_country_renames() {
  let s = store().await;
  seed_country(&s, "ro").await;

  assert!(s.update_country("ro", "Romania").await.unwrap());
  assert_eq!(s.get_country("ro").await.unwrap().unwrap().name, "Romania");

  assert!(!s.update_country("xx", "Nowhere").await.unwrap());
}

#[tokio::test]
async fn delete_country_cascades_to_tenant_rows() {
  let s = store().await;
  seed_country(&s, "ro").await;
  let src = s.add_source(new_source("ro")).await.unwrap();

  assert_eq!(s.delete_country("ro").await.unwrap(), DeleteOutcome::Deleted);
  assert!(s.get_source("ro", src.id).await.unwrap().is_none());

  assert_eq!(s.delete_country("ro").await.unwrap(), DeleteOutcome::NotFound);
}

#[tokio::test]
async fn delete_country_cascade_overrides_protected_references() {
  // A trend protects its source against direct deletion, but the country
  // cascade removes both in one statement.
  let s = store().await;
  seed_country(&s, "ro").await;
  let src = s.add_source(new_source("ro")).await.unwrap();
  let trend = s.add_trend(new_trend("ro", src.id)).await.unwrap();

  assert_eq!(
    s.delete_source("ro", src.id).await.unwrap(),
    DeleteOutcome::Protected
  );
  assert_eq!(s.delete_country("ro").await.unwrap(), DeleteOutcome::Deleted);
  assert!(s.get_trend("ro", trend.id).await.unwrap().is_none());
  assert!(s.get_source("ro", src.id).await.unwrap().is_none());
}

// ─── Sources ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_source() {
  let s = store().await;
  seed_country(&s, "ro").await;

  let src = s.add_source(new_source("ro")).await.unwrap();
  let fetched = s.get_source("ro", src.id).await.unwrap().unwrap();
  assert_eq!(fetched, src);
}

#[tokio::test]
async fn source_reads_are_tenant_scoped() {
  let s = store().await;
  seed_country(&s, "ro").await;
  seed_country(&s, "si").await;

  let ro_src = s.add_source(new_source("ro")).await.unwrap();

  // The row exists, but not for the other tenant.
  assert!(s.get_source("si", ro_src.id).await.unwrap().is_none());
  assert!(s.list_sources("si", ListQuery::default()).await.unwrap().is_empty());
  assert_eq!(s.count_sources("si").await.unwrap(), 0);
  assert_eq!(s.count_sources("ro").await.unwrap(), 1);
}

#[tokio::test]
async fn list_sources_windowing() {
  let s = store().await;
  seed_country(&s, "ro").await;
  for _ in 0..5 {
    s.add_source(new_source("ro")).await.unwrap();
  }

  let all = s.list_sources("ro", ListQuery::default()).await.unwrap();
  assert_eq!(all.len(), 5);

  let page = s
    .list_sources("ro", ListQuery::window(2, 2))
    .await
    .unwrap();
  assert_eq!(page.len(), 2);
  assert_eq!(page[0].id, all[2].id);
  assert_eq!(page[1].id, all[3].id);

  let tail = s
    .list_sources("ro", ListQuery::window(2, 4))
    .await
    .unwrap();
  assert_eq!(tail.len(), 1);
}

#[tokio::test]
async fn update_source_is_tenant_scoped() {
  let s = store().await;
  seed_country(&s, "ro").await;
  seed_country(&s, "si").await;
  let src = s.add_source(new_source("ro")).await.unwrap();

  let mut fields = new_source("ro");
  fields.short_name = "EEA (renamed)".into();
  assert!(s.update_source("ro", src.id, fields.clone()).await.unwrap());
  assert_eq!(
    s.get_source("ro", src.id).await.unwrap().unwrap().short_name,
    "EEA (renamed)"
  );

  // Wrong tenant or wrong id: no row touched.
  assert!(!s.update_source("si", src.id, fields.clone()).await.unwrap());
  assert!(!s.update_source("ro", src.id + 100, fields).await.unwrap());
}

#[tokio::test]
async fn delete_source_referenced_by_trend_is_protected() {
  let s = store().await;
  seed_country(&s, "ro").await;
  let src = s.add_source(new_source("ro")).await.unwrap();
  s.add_trend(new_trend("ro", src.id)).await.unwrap();

  assert_eq!(
    s.delete_source("ro", src.id).await.unwrap(),
    DeleteOutcome::Protected
  );
  assert!(s.get_source("ro", src.id).await.unwrap().is_some());
}

#[tokio::test]
async fn delete_source_outcomes() {
  let s = store().await;
  seed_country(&s, "ro").await;
  let src = s.add_source(new_source("ro")).await.unwrap();

  assert_eq!(
    s.delete_source("ro", src.id).await.unwrap(),
    DeleteOutcome::Deleted
  );
  assert_eq!(
    s.delete_source("ro", src.id).await.unwrap(),
    DeleteOutcome::NotFound
  );
}

// ─── Categories ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn category_kinds_are_isolated_tables() {
  let s = store().await;
  seed_country(&s, "ro").await;

  let thematic = s
    .add_category(CategoryKind::Thematic, NewCategory {
      country:     "ro".into(),
      code:        "agri".into(),
      description: "Agriculture".into(),
    })
    .await
    .unwrap();

  // The row only exists for its own kind.
  assert!(
    s.get_category(CategoryKind::Steep, "ro", thematic.id)
      .await
      .unwrap()
      .is_none()
  );
  assert_eq!(
    s.list_categories(CategoryKind::Thematic, "ro").await.unwrap().len(),
    1
  );
  assert!(s.list_categories(CategoryKind::Steep, "ro").await.unwrap().is_empty());
}

#[tokio::test]
async fn update_and_delete_category() {
  let s = store().await;
  seed_country(&s, "ro").await;
  let cat = s
    .add_category(CategoryKind::GeographicalScale, NewCategory {
      country:     "ro".into(),
      code:        "nat".into(),
      description: "National".into(),
    })
    .await
    .unwrap();

  let updated = s
    .update_category(CategoryKind::GeographicalScale, "ro", cat.id, NewCategory {
      country:     "ro".into(),
      code:        "reg".into(),
      description: "Regional".into(),
    })
    .await
    .unwrap();
  assert!(updated);

  assert_eq!(
    s.delete_category(CategoryKind::GeographicalScale, "ro", cat.id)
      .await
      .unwrap(),
    DeleteOutcome::Deleted
  );
}

#[tokio::test]
async fn delete_steep_category_referenced_by_gmt_is_protected() {
  let s = store().await;
  seed_country(&s, "ro").await;
  let src = s.add_source(new_source("ro")).await.unwrap();
  let steep = s
    .add_category(CategoryKind::Steep, NewCategory {
      country:     "ro".into(),
      code:        "soc".into(),
      description: "Societal".into(),
    })
    .await
    .unwrap();

  let mut gmt = new_foresight("ro", src.id);
  gmt.steep_category_id = Some(steep.id);
  gmt.url = Some("http://example.com/gmt".into());
  s.add_foresight(ForesightKind::Gmt, gmt).await.unwrap();

  assert_eq!(
    s.delete_category(CategoryKind::Steep, "ro", steep.id).await.unwrap(),
    DeleteOutcome::Protected
  );
}

// ─── Foresight items ─────────────────────────────────────────────────────────

#[tokio::test]
async fn foresight_kinds_are_isolated_tables() {
  let s = store().await;
  seed_country(&s, "ro").await;
  let src = s.add_source(new_source("ro")).await.unwrap();

  let wild = s
    .add_foresight(ForesightKind::WildCard, new_foresight("ro", src.id))
    .await
    .unwrap();
  assert_eq!(wild.kind, ForesightKind::WildCard);

  assert!(
    s.get_foresight(ForesightKind::EarlyWarning, "ro", wild.id)
      .await
      .unwrap()
      .is_none()
  );
  assert_eq!(
    s.count_foresight(ForesightKind::WildCard, "ro").await.unwrap(),
    1
  );
  assert_eq!(
    s.count_foresight(ForesightKind::EarlyWarning, "ro").await.unwrap(),
    0
  );
}

#[tokio::test]
async fn gmt_url_round_trips() {
  let s = store().await;
  seed_country(&s, "ro").await;
  let src = s.add_source(new_source("ro")).await.unwrap();

  let mut fields = new_foresight("ro", src.id);
  fields.url = Some("http://example.com/gmt".into());
  let gmt = s.add_foresight(ForesightKind::Gmt, fields).await.unwrap();

  let fetched = s
    .get_foresight(ForesightKind::Gmt, "ro", gmt.id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched.url.as_deref(), Some("http://example.com/gmt"));
}

// ─── Indicators ──────────────────────────────────────────────────────────────

async fn seed_indicator(s: &SqliteStore, country: &str) -> i64 {
  let src = s.add_source(new_source(country)).await.unwrap();
  let thematic = s
    .add_category(CategoryKind::Thematic, NewCategory {
      country:     country.into(),
      code:        "env".into(),
      description: "Environment".into(),
    })
    .await
    .unwrap();
  let timeline = s
    .add_timeline(NewTimeline { country: country.into(), title: "2050".into() })
    .await
    .unwrap();

  s.add_indicator(NewIndicator {
    country:                  country.into(),
    code:                     "I1".into(),
    description:              "CO2".into(),
    thematic_category_id:     thematic.id,
    geographical_scale_id:    None,
    geographical_coverage_id: None,
    timeline_id:              timeline.id,
    source_id:                src.id,
    base_year:                "2000".into(),
    end_year:                 "2010".into(),
    ownership:                "public".into(),
    file_path:                None,
  })
  .await
  .unwrap()
  .id
}

#[tokio::test]
async fn indicator_optional_references_round_trip_as_none() {
  let s = store().await;
  seed_country(&s, "ro").await;
  let id = seed_indicator(&s, "ro").await;

  let ind = s.get_indicator("ro", id).await.unwrap().unwrap();
  assert_eq!(ind.geographical_scale_id, None);
  assert_eq!(ind.geographical_coverage_id, None);
}

#[tokio::test]
async fn delete_timeline_referenced_by_indicator_is_protected() {
  let s = store().await;
  seed_country(&s, "ro").await;
  let id = seed_indicator(&s, "ro").await;
  let timeline_id = s.get_indicator("ro", id).await.unwrap().unwrap().timeline_id;

  assert_eq!(
    s.delete_timeline("ro", timeline_id).await.unwrap(),
    DeleteOutcome::Protected
  );
}

// ─── Interlinks ──────────────────────────────────────────────────────────────

async fn seed_interlink(s: &SqliteStore, country: &str) -> (i64, i64, i64, i64) {
  let src = s.add_source(new_source(country)).await.unwrap();
  let trend = s.add_trend(new_trend(country, src.id)).await.unwrap();
  let mut gmt_fields = new_foresight(country, src.id);
  gmt_fields.url = Some("http://example.com/gmt".into());
  let gmt = s.add_foresight(ForesightKind::Gmt, gmt_fields).await.unwrap();
  let indicator = seed_indicator(s, country).await;

  let link = s
    .add_interlink(NewInterlink {
      country:        country.into(),
      gmt_id:         gmt.id,
      trend_id:       trend.id,
      indicator_1_id: indicator,
      indicator_2_id: None,
      indicator_3_id: None,
      indicator_4_id: None,
    })
    .await
    .unwrap();

  (link.id, gmt.id, trend.id, indicator)
}

#[tokio::test]
async fn deleting_a_gmt_cascades_to_its_interlinks() {
  let s = store().await;
  seed_country(&s, "ro").await;
  let (link_id, gmt_id, _, _) = seed_interlink(&s, "ro").await;

  assert_eq!(
    s.delete_foresight(ForesightKind::Gmt, "ro", gmt_id).await.unwrap(),
    DeleteOutcome::Deleted
  );
  assert!(s.get_interlink("ro", link_id).await.unwrap().is_none());
}

#[tokio::test]
async fn deleting_a_trend_in_an_interlink_is_protected() {
  let s = store().await;
  seed_country(&s, "ro").await;
  let (_, _, trend_id, _) = seed_interlink(&s, "ro").await;

  assert_eq!(
    s.delete_trend("ro", trend_id).await.unwrap(),
    DeleteOutcome::Protected
  );
}

#[tokio::test]
async fn interlink_count_and_window() {
  let s = store().await;
  seed_country(&s, "ro").await;
  seed_interlink(&s, "ro").await;

  assert_eq!(s.count_interlinks("ro").await.unwrap(), 1);
  assert_eq!(
    s.list_interlinks("ro", ListQuery::window(25, 0)).await.unwrap().len(),
    1
  );
  assert!(
    s.list_interlinks("ro", ListQuery::window(25, 25)).await.unwrap().is_empty()
  );
}
