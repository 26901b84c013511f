//! The country picker and the per-tenant section index.

use axum::{
  extract::State,
  response::{Html, IntoResponse, Response},
};

use flis_core::{display::FieldValue, store::FlisStore};

use crate::{
  AppState, error::Error, html::PageBuilder, tenancy::CurrentCountry, urls,
};

use super::nav;

/// `GET /` — pick a tenant, or jump to country management.
pub async fn country_picker<S>(
  State(state): State<AppState<S>>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let countries = state.store.list_countries().await.map_err(Error::store)?;

  let cells: Vec<Vec<FieldValue>> = countries
    .iter()
    .map(|c| {
      vec![
        FieldValue::link(urls::country_index_url(&c.iso), c.iso.clone()),
        FieldValue::text(c.name.clone()),
      ]
    })
    .collect();

  let mut page = PageBuilder::new("Countries");
  page.list_table(&["ISO", "Name"], &cells);
  page.action_link(&urls::management::countries_url(), "Manage countries");
  Ok(Html(page.finish()).into_response())
}

/// `GET /{country}/` — the tenant's landing page; the nav carries every
/// section.
pub async fn section_index<S>(
  State(_state): State<AppState<S>>,
  CurrentCountry(country): CurrentCountry,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let mut page =
    PageBuilder::new(&format!("{} ({})", country.name, country.iso));
  page.nav(&nav(&country.iso));
  page.paragraph("Pick a section to browse this country's catalogue.");
  Ok(Html(page.finish()).into_response())
}
