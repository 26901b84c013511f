//! Integration tests driving the full router over an in-memory store.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use tower::ServiceExt as _;

use flis_core::{
  category::{CategoryKind, NewCategory},
  country::NewCountry,
  foresight::{ForesightKind, NewForesightItem},
  indicator::NewIndicator,
  source::{NewSource, Source},
  store::FlisStore,
  timeline::NewTimeline,
  trend::NewTrend,
};
use flis_store_sqlite::SqliteStore;

use crate::{AppState, ServerConfig, auth::AuthConfig, router};

// ─── Harness ─────────────────────────────────────────────────────────────────

fn test_config() -> ServerConfig {
  ServerConfig {
    host:               "127.0.0.1".into(),
    port:               8000,
    hostname:           "http://flis.example".into(),
    store_path:         ":memory:".into(),
    auth_username:      None,
    auth_password_hash: None,
  }
}

async fn make_state() -> AppState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  store
    .add_country(NewCountry { iso: "ro".into(), name: "Romania".into() })
    .await
    .unwrap();
  store
    .add_country(NewCountry { iso: "si".into(), name: "Slovenia".into() })
    .await
    .unwrap();

  AppState {
    store:  Arc::new(store),
    config: Arc::new(test_config()),
    auth:   None,
  }
}

async fn get(state: &AppState<SqliteStore>, uri: &str) -> Response {
  router(state.clone())
    .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
    .await
    .unwrap()
}

async fn post_form(
  state: &AppState<SqliteStore>,
  uri: &str,
  body: &str,
) -> Response {
  post_form_with_headers(state, uri, body, vec![]).await
}

async fn post_form_with_headers(
  state: &AppState<SqliteStore>,
  uri: &str,
  body: &str,
  headers: Vec<(header::HeaderName, String)>,
) -> Response {
  let mut builder = Request::builder()
    .method("POST")
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
  for (name, value) in headers {
    builder = builder.header(name, value);
  }
  router(state.clone())
    .oneshot(builder.body(Body::from(body.to_string())).unwrap())
    .await
    .unwrap()
}

async fn body_string(resp: Response) -> String {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  String::from_utf8_lossy(&bytes).into_owned()
}

fn location(resp: &Response) -> String {
  resp
    .headers()
    .get(header::LOCATION)
    .expect("Location header")
    .to_str()
    .unwrap()
    .to_string()
}

// ─── Seed helpers ────────────────────────────────────────────────────────────

fn source_fields(country: &str, short_name: &str) -> NewSource {
  NewSource {
    country:             country.into(),
    short_name:          short_name.into(),
    long_name:           "European Environment Agency".into(),
    year_of_publication: "2012".into(),
    author:              "EEA".into(),
    url:                 "http://example.com/report".into(),
    summary:             String::new(),
  }
}

async fn seed_source(
  state: &AppState<SqliteStore>,
  country: &str,
  short_name: &str,
) -> Source {
  state
    .store
    .add_source(source_fields(country, short_name))
    .await
    .unwrap()
}

/// A GMT, a trend and an indicator for `country`, each backed by a fresh
/// source. Returns `(gmt_id, trend_id, indicator_id)`.
async fn seed_interlink_targets(
  state: &AppState<SqliteStore>,
  country: &str,
) -> (i64, i64, i64) {
  let source = seed_source(state, country, "seed").await;

  let gmt = state
    .store
    .add_foresight(ForesightKind::Gmt, NewForesightItem {
      country:           country.into(),
      code:              "GMT-1".into(),
      steep_category_id: None,
      description:       "Global megatrend".into(),
      source_id:         source.id,
      url:               Some("http://example.com/gmt".into()),
      ownership:         "public".into(),
      summary:           String::new(),
      file_path:         None,
    })
    .await
    .unwrap();

  let trend = state
    .store
    .add_trend(NewTrend {
      country:     country.into(),
      code:        "T-1".into(),
      description: "Urbanisation".into(),
      source_id:   source.id,
      ownership:   "public".into(),
      summary:     String::new(),
      file_path:   None,
    })
    .await
    .unwrap();

  let thematic = state
    .store
    .add_category(CategoryKind::Thematic, NewCategory {
      country:     country.into(),
      code:        "env".into(),
      description: "Environment".into(),
    })
    .await
    .unwrap();
  let timeline = state
    .store
    .add_timeline(NewTimeline { country: country.into(), title: "2050".into() })
    .await
    .unwrap();
  let indicator = state
    .store
    .add_indicator(NewIndicator {
      country:                  country.into(),
      code:                     "I-1".into(),
      description:              "CO2".into(),
      thematic_category_id:     thematic.id,
      geographical_scale_id:    None,
      geographical_coverage_id: None,
      timeline_id:              timeline.id,
      source_id:                source.id,
      base_year:                "2000".into(),
      end_year:                 "2010".into(),
      ownership:                "public".into(),
      file_path:                None,
    })
    .await
    .unwrap();

  (gmt.id, trend.id, indicator.id)
}

const SOURCE_FORM: &str = "country=ro&short_name=EEA&long_name=Agency\
&year_of_publication=2012&author=EEA&url=http://example.com&summary=";

// ─── Tenancy ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_country_is_not_found() {
  let state = make_state().await;
  let resp = get(&state, "/xx/sources/").await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn country_picker_lists_countries() {
  let state = make_state().await;
  let resp = get(&state, "/").await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_string(resp).await;
  assert!(body.contains("Romania"), "body: {body}");
  assert!(body.contains("Slovenia"), "body: {body}");
}

#[tokio::test]
async fn section_index_links_every_section() {
  let state = make_state().await;
  let resp = get(&state, "/ro/").await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_string(resp).await;
  for href in [
    "/ro/sources/",
    "/ro/trends/",
    "/ro/indicators/",
    "/ro/interlinks/",
    "/ro/timelines/",
    "/ro/scenarios/",
    "/ro/gmts/",
    "/ro/flis-models/",
    "/ro/horizon-scannings/",
    "/ro/methods-tools/",
    "/ro/uncertainties/",
    "/ro/wild-cards/",
    "/ro/early-warnings/",
    "/ro/thematic-categories/",
    "/ro/geographical-scales/",
    "/ro/geographical-coverages/",
    "/ro/steep-categories/",
  ] {
    assert!(body.contains(href), "missing {href} in: {body}");
  }
}

#[tokio::test]
async fn cross_tenant_rows_are_invisible() {
  let state = make_state().await;
  let source = seed_source(&state, "ro", "EEA").await;

  let resp = get(&state, &format!("/si/sources/{}", source.id)).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let resp = get(&state, "/si/sources/").await;
  let body = body_string(resp).await;
  assert!(!body.contains("EEA"), "body: {body}");
}

// ─── CRUD flow ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn source_create_list_detail_flow() {
  let state = make_state().await;

  let resp = post_form(&state, "/ro/sources/new", SOURCE_FORM).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  let detail_url = location(&resp);

  let resp = get(&state, &detail_url).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_string(resp).await;
  assert!(body.contains("EEA"), "body: {body}");
  assert!(body.contains("Agency"), "body: {body}");

  let resp = get(&state, "/ro/sources/").await;
  let body = body_string(resp).await;
  assert!(body.contains(&detail_url), "body: {body}");
}

#[tokio::test]
async fn country_mismatch_is_a_field_error() {
  let state = make_state().await;
  let form = SOURCE_FORM.replace("country=ro", "country=si");

  let resp = post_form(&state, "/ro/sources/new", &form).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_string(resp).await;
  assert!(body.contains("Country not valid"), "body: {body}");

  // Nothing was written for either tenant.
  assert_eq!(state.store.count_sources("ro").await.unwrap(), 0);
  assert_eq!(state.store.count_sources("si").await.unwrap(), 0);
}

#[tokio::test]
async fn missing_required_fields_rerender_the_form() {
  let state = make_state().await;
  let resp = post_form(&state, "/ro/sources/new", "country=ro").await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_string(resp).await;
  assert!(body.contains("This field is required."), "body: {body}");
}

#[tokio::test]
async fn edit_updates_the_row() {
  let state = make_state().await;
  let source = seed_source(&state, "ro", "EEA").await;

  let form = SOURCE_FORM.replace("short_name=EEA", "short_name=Renamed");
  let resp =
    post_form(&state, &format!("/ro/sources/{}/edit", source.id), &form).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);

  let stored = state.store.get_source("ro", source.id).await.unwrap().unwrap();
  assert_eq!(stored.short_name, "Renamed");
}

#[tokio::test]
async fn delete_flow_removes_the_row() {
  let state = make_state().await;
  let source = seed_source(&state, "ro", "EEA").await;

  let resp = get(&state, &format!("/ro/sources/{}/delete", source.id)).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_string(resp).await;
  assert!(body.contains("Are you sure"), "body: {body}");

  let resp =
    post_form(&state, &format!("/ro/sources/{}/delete", source.id), "").await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(location(&resp), "/ro/sources/");

  let resp = get(&state, &format!("/ro/sources/{}", source.id)).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn protected_delete_is_a_conflict() {
  let state = make_state().await;
  let source = seed_source(&state, "ro", "EEA").await;
  state
    .store
    .add_trend(NewTrend {
      country:     "ro".into(),
      code:        "T-1".into(),
      description: "Urbanisation".into(),
      source_id:   source.id,
      ownership:   "public".into(),
      summary:     String::new(),
      file_path:   None,
    })
    .await
    .unwrap();

  let resp =
    post_form(&state, &format!("/ro/sources/{}/delete", source.id), "").await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
  assert!(state.store.get_source("ro", source.id).await.unwrap().is_some());
}

// ─── Pagination ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_pagination_bounds() {
  let state = make_state().await;
  for i in 1..=26 {
    seed_source(&state, "ro", &format!("src-{i:02}")).await;
  }

  let resp = get(&state, "/ro/sources/").await;
  let body = body_string(resp).await;
  assert!(body.contains("src-01"), "body: {body}");
  assert!(!body.contains("src-26"), "page 1 should stop at 25 rows: {body}");
  assert!(body.contains("Page 1 of 2"), "body: {body}");

  let resp = get(&state, "/ro/sources/?page=2").await;
  let body = body_string(resp).await;
  assert!(body.contains("src-26"), "body: {body}");
  assert!(!body.contains("src-01"), "body: {body}");

  let resp = get(&state, "/ro/sources/?page=3").await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let resp = get(&state, "/ro/sources/?page=0").await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ─── Kind-scoped sections ────────────────────────────────────────────────────

#[tokio::test]
async fn category_sections_are_kind_scoped() {
  let state = make_state().await;
  let resp = post_form(
    &state,
    "/ro/thematic-categories/new",
    "country=ro&code=env&description=Environment",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);

  let body = body_string(get(&state, "/ro/thematic-categories/").await).await;
  assert!(body.contains("Environment"), "body: {body}");

  let body = body_string(get(&state, "/ro/steep-categories/").await).await;
  assert!(!body.contains("Environment"), "body: {body}");
}

#[tokio::test]
async fn gmts_require_a_url_but_flis_models_do_not() {
  let state = make_state().await;
  let source = seed_source(&state, "ro", "EEA").await;
  let base = format!(
    "country=ro&code=X1&description=Desc&source={}&ownership=public&summary=",
    source.id
  );

  let resp = post_form(&state, "/ro/gmts/new", &base).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_string(resp).await;
  assert!(body.contains("This field is required."), "body: {body}");

  let resp = post_form(&state, "/ro/flis-models/new", &base).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn foresight_reference_must_belong_to_the_tenant() {
  let state = make_state().await;
  let foreign = seed_source(&state, "si", "SI-source").await;
  let form = format!(
    "country=ro&code=X1&description=Desc&source={}&ownership=public&summary=",
    foreign.id
  );

  let resp = post_form(&state, "/ro/flis-models/new", &form).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_string(resp).await;
  assert!(body.contains("Select a valid choice."), "body: {body}");
}

// ─── Indicators and interlinks ───────────────────────────────────────────────

#[tokio::test]
async fn indicator_invalid_reference_is_an_invalid_choice() {
  let state = make_state().await;
  let source = seed_source(&state, "ro", "EEA").await;
  let form = format!(
    "country=ro&code=I1&description=CO2&thematic_category=999&timeline=999\
     &source={}&base_year=2000&end_year=2010&ownership=public",
    source.id
  );

  let resp = post_form(&state, "/ro/indicators/new", &form).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_string(resp).await;
  assert!(body.contains("Select a valid choice."), "body: {body}");
}

#[tokio::test]
async fn interlink_create_and_detail_flow() {
  let state = make_state().await;
  let (gmt_id, trend_id, indicator_id) = seed_interlink_targets(&state, "ro").await;

  let form = format!(
    "country=ro&gmt={gmt_id}&trend={trend_id}&indicator_1={indicator_id}\
     &indicator_2=&indicator_3=&indicator_4="
  );
  let resp = post_form(&state, "/ro/interlinks/new", &form).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  let detail_url = location(&resp);

  let body = body_string(get(&state, &detail_url).await).await;
  assert!(body.contains("GMT-1"), "body: {body}");
  assert!(body.contains("Urbanisation"), "body: {body}");
  // Unused indicator slots render as None.
  assert!(body.contains("<td>None</td>"), "body: {body}");
}

// ─── Attachments ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn attachment_links_against_the_configured_hostname() {
  let state = make_state().await;
  let source = seed_source(&state, "ro", "EEA").await;
  let trend = state
    .store
    .add_trend(NewTrend {
      country:     "ro".into(),
      code:        "T-1".into(),
      description: "Urbanisation".into(),
      source_id:   source.id,
      ownership:   "public".into(),
      summary:     String::new(),
      file_path:   Some("/files/report.pdf".into()),
    })
    .await
    .unwrap();

  let body = body_string(get(&state, &format!("/ro/trends/{}", trend.id)).await).await;
  assert!(
    body.contains(r#"href="http://flis.example/files/report.pdf""#),
    "body: {body}"
  );
  assert!(body.contains(">report.pdf<"), "body: {body}");
  // The source's own URL is appended as the final row.
  assert!(body.contains("http://example.com/report"), "body: {body}");
}

// ─── Management ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn management_country_create_and_duplicate() {
  let state = make_state().await;

  let resp =
    post_form(&state, "/management/countries/new", "iso=hu&name=Hungary").await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert!(state.store.get_country("hu").await.unwrap().is_some());

  let resp =
    post_form(&state, "/management/countries/new", "iso=hu&name=Hungary").await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_string(resp).await;
  assert!(body.contains("already exists"), "body: {body}");
}

#[tokio::test]
async fn management_rename_and_delete_country() {
  let state = make_state().await;

  let resp =
    post_form(&state, "/management/countries/ro/edit", "name=Rumania").await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert_eq!(state.store.get_country("ro").await.unwrap().unwrap().name, "Rumania");

  let resp = post_form(&state, "/management/countries/si/delete", "").await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert!(state.store.get_country("si").await.unwrap().is_none());
}

// ─── Auth ────────────────────────────────────────────────────────────────────

async fn make_state_with_auth(password: &str) -> AppState<SqliteStore> {
  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};

  let mut state = make_state().await;
  let salt = SaltString::generate(&mut rand_core::OsRng);
  let hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .unwrap()
    .to_string();
  state.auth = Some(Arc::new(AuthConfig {
    username:      "user".into(),
    password_hash: hash,
  }));
  state
}

fn auth_header(user: &str, pass: &str) -> String {
  use base64::Engine as _;
  format!(
    "Basic {}",
    base64::engine::general_purpose::STANDARD.encode(format!("{user}:{pass}"))
  )
}

#[tokio::test]
async fn auth_gates_mutating_screens_only() {
  let state = make_state_with_auth("secret").await;

  // Read screens stay open.
  let resp = get(&state, "/ro/sources/").await;
  assert_eq!(resp.status(), StatusCode::OK);

  // Mutations require credentials.
  let resp = get(&state, "/ro/sources/new").await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));

  let resp = post_form(&state, "/ro/sources/new", SOURCE_FORM).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let resp = post_form_with_headers(
    &state,
    "/ro/sources/new",
    SOURCE_FORM,
    vec![(header::AUTHORIZATION, auth_header("user", "secret"))],
  )
  .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);

  let resp = post_form_with_headers(
    &state,
    "/ro/sources/new",
    SOURCE_FORM,
    vec![(header::AUTHORIZATION, auth_header("user", "wrong"))],
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
