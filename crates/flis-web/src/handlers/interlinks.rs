//! Screens for interlinks — the junction entity tying a GMT to a trend and
//! up to four indicators.
//!
//! Every referenced label comes from the tenant's own rows, so the list and
//! detail screens resolve references through per-request label maps rather
//! than row-by-row lookups.

use std::collections::HashMap;

use axum::{
  Form, Router,
  extract::{Path, Query, State},
  response::{Html, IntoResponse, Redirect, Response},
  routing::get,
};

use flis_core::{
  display::{DetailRow, DetailTable, FieldValue},
  foresight::ForesightKind,
  interlink::{Interlink, NewInterlink},
  store::{DeleteOutcome, FlisStore},
};

use crate::{
  AppState,
  auth::Authenticated,
  error::Error,
  forms::{FormErrors, INVALID_CHOICE, InterlinkForm},
  html::{FormField, PageBuilder, Widget},
  tenancy::CurrentCountry,
  urls,
};

use super::{
  ALL, IdPath, PageParams, confirm_page, country_options, form_page, list_page,
  nav, paginate,
};

pub const SLUG: &str = "interlinks";

pub fn routes<S>() -> Router<AppState<S>>
where
  S: FlisStore + Clone + 'static,
{
  Router::new()
    .route("/interlinks/", get(list::<S>))
    .route("/interlinks/new", get(new_form::<S>).post(create::<S>))
    .route("/interlinks/{id}", get(detail::<S>))
    .route("/interlinks/{id}/edit", get(edit_form::<S>).post(update::<S>))
    .route(
      "/interlinks/{id}/delete",
      get(delete_confirm::<S>).post(delete::<S>),
    )
}

/// Label maps for the rows an interlink can reference.
struct Labels {
  gmts:       HashMap<i64, String>,
  trends:     HashMap<i64, String>,
  indicators: HashMap<i64, String>,
}

async fn labels<S>(state: &AppState<S>, country: &str) -> Result<Labels, Error>
where
  S: FlisStore + Clone + 'static,
{
  let gmts = state
    .store
    .list_foresight(ForesightKind::Gmt, country, ALL)
    .await
    .map_err(Error::store)?
    .into_iter()
    .map(|g| (g.id, g.code))
    .collect();
  let trends = state
    .store
    .list_trends(country, ALL)
    .await
    .map_err(Error::store)?
    .into_iter()
    .map(|t| (t.id, t.description))
    .collect();
  let indicators = state
    .store
    .list_indicators(country)
    .await
    .map_err(Error::store)?
    .into_iter()
    .map(|i| (i.id, i.code))
    .collect();

  Ok(Labels { gmts, trends, indicators })
}

async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentCountry(country): CurrentCountry,
  Query(params): Query<PageParams>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let total = state
    .store
    .count_interlinks(&country.iso)
    .await
    .map_err(Error::store)?;
  let (query, pagination) = paginate(total, params.page)?;
  let rows = state
    .store
    .list_interlinks(&country.iso, query)
    .await
    .map_err(Error::store)?;
  let labels = labels(&state, &country.iso).await?;

  let cells: Vec<Vec<FieldValue>> = rows
    .iter()
    .map(|link| {
      vec![
        FieldValue::link(
          urls::detail_url(&country.iso, SLUG, link.id),
          labels
            .gmts
            .get(&link.gmt_id)
            .cloned()
            .unwrap_or_else(|| link.gmt_id.to_string()),
        ),
        FieldValue::opt(labels.trends.get(&link.trend_id).cloned()),
        FieldValue::opt(labels.indicators.get(&link.indicator_1_id).cloned()),
      ]
    })
    .collect();

  Ok(list_page(
    &nav(&country.iso),
    &format!("Interlinks ({})", country.iso),
    &urls::new_url(&country.iso, SLUG),
    "New interlink",
    &["GMT", "Trend", "Indicator"],
    &cells,
    Some((&urls::section_url(&country.iso, SLUG), &pagination)),
  ))
}

async fn detail<S>(
  State(state): State<AppState<S>>,
  CurrentCountry(country): CurrentCountry,
  Path(IdPath { id }): Path<IdPath>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let link = state
    .store
    .get_interlink(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;
  let labels = labels(&state, &country.iso).await?;

  let title = labels
    .gmts
    .get(&link.gmt_id)
    .cloned()
    .unwrap_or_else(|| link.gmt_id.to_string());
  let mut page = PageBuilder::new(&format!("Interlink: {title}"));
  page.nav(&nav(&country.iso));
  page.detail_table(&detail_table(&link, &labels));
  page.action_link(&urls::edit_url(&country.iso, SLUG, id), "Edit");
  page.action_link(&urls::delete_url(&country.iso, SLUG, id), "Delete");
  Ok(Html(page.finish()).into_response())
}

fn indicator_value(labels: &Labels, id: Option<i64>) -> FieldValue {
  match id {
    Some(id) => FieldValue::opt(labels.indicators.get(&id).cloned()),
    None => FieldValue::Missing,
  }
}

// All four indicator columns share one label, like the model they render.
fn detail_table(link: &Interlink, labels: &Labels) -> DetailTable {
  DetailTable {
    rows:       vec![
      DetailRow::new("Country", FieldValue::text(link.country.clone())),
      DetailRow::new("GMT", FieldValue::opt(labels.gmts.get(&link.gmt_id).cloned())),
      DetailRow::new(
        "Trend",
        FieldValue::opt(labels.trends.get(&link.trend_id).cloned()),
      ),
      DetailRow::new(
        "Indicator",
        FieldValue::opt(labels.indicators.get(&link.indicator_1_id).cloned()),
      ),
      DetailRow::new("Indicator", indicator_value(labels, link.indicator_2_id)),
      DetailRow::new("Indicator", indicator_value(labels, link.indicator_3_id)),
      DetailRow::new("Indicator", indicator_value(labels, link.indicator_4_id)),
    ],
    source_url: None,
  }
}

// HashMap iteration order is arbitrary; selects should be stable.
fn options_from(labels: &HashMap<i64, String>) -> Vec<(String, String)> {
  let mut ids: Vec<i64> = labels.keys().copied().collect();
  ids.sort_unstable();
  ids
    .into_iter()
    .map(|id| (id.to_string(), labels[&id].clone()))
    .collect()
}

async fn form_fields<S>(
  state: &AppState<S>,
  country: &str,
  form: &InterlinkForm,
) -> Result<Vec<FormField>, Error>
where
  S: FlisStore + Clone + 'static,
{
  let countries = state.store.list_countries().await.map_err(Error::store)?;
  let labels = labels(state, country).await?;
  let gmt_options = options_from(&labels.gmts);
  let trend_options = options_from(&labels.trends);
  let indicator_options = options_from(&labels.indicators);

  Ok(vec![
    FormField {
      name:   "country",
      label:  "Country",
      widget: Widget::select(country_options(&countries), form.country.clone()),
    },
    FormField {
      name:   "gmt",
      label:  "GMT",
      widget: Widget::select(gmt_options, form.gmt.clone()),
    },
    FormField {
      name:   "trend",
      label:  "Trend",
      widget: Widget::select(trend_options, form.trend.clone()),
    },
    FormField {
      name:   "indicator_1",
      label:  "Indicator",
      widget: Widget::select(indicator_options.clone(), form.indicator_1.clone()),
    },
    FormField {
      name:   "indicator_2",
      label:  "Indicator",
      widget: Widget::select(indicator_options.clone(), form.indicator_2.clone()),
    },
    FormField {
      name:   "indicator_3",
      label:  "Indicator",
      widget: Widget::select(indicator_options.clone(), form.indicator_3.clone()),
    },
    FormField {
      name:   "indicator_4",
      label:  "Indicator",
      widget: Widget::select(indicator_options, form.indicator_4.clone()),
    },
  ])
}

async fn check_references<S>(
  state: &AppState<S>,
  country: &str,
  fields: &NewInterlink,
  errors: &mut FormErrors,
) -> Result<(), Error>
where
  S: FlisStore + Clone + 'static,
{
  if state
    .store
    .get_foresight(ForesightKind::Gmt, country, fields.gmt_id)
    .await
    .map_err(Error::store)?
    .is_none()
  {
    errors.add("gmt", INVALID_CHOICE);
  }
  if state
    .store
    .get_trend(country, fields.trend_id)
    .await
    .map_err(Error::store)?
    .is_none()
  {
    errors.add("trend", INVALID_CHOICE);
  }

  let indicator_fields: [(&'static str, Option<i64>); 4] = [
    ("indicator_1", Some(fields.indicator_1_id)),
    ("indicator_2", fields.indicator_2_id),
    ("indicator_3", fields.indicator_3_id),
    ("indicator_4", fields.indicator_4_id),
  ];
  for (name, id) in indicator_fields {
    if let Some(id) = id
      && state
        .store
        .get_indicator(country, id)
        .await
        .map_err(Error::store)?
        .is_none()
    {
      errors.add(name, INVALID_CHOICE);
    }
  }
  Ok(())
}

async fn new_form<S>(
  State(state): State<AppState<S>>,
  CurrentCountry(country): CurrentCountry,
  _auth: Authenticated,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let form = InterlinkForm::default();
  let fields = form_fields(&state, &country.iso, &form).await?;
  Ok(form_page(
    &nav(&country.iso),
    "New interlink",
    &urls::new_url(&country.iso, SLUG),
    &fields,
    &FormErrors::default(),
    &urls::section_url(&country.iso, SLUG),
  ))
}

async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentCountry(country): CurrentCountry,
  _auth: Authenticated,
  Form(form): Form<InterlinkForm>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let errors = match form.validate() {
    Ok(fields) => {
      let mut errors = FormErrors::default();
      check_references(&state, &country.iso, &fields, &mut errors).await?;
      if errors.is_empty() {
        let link = state.store.add_interlink(fields).await.map_err(Error::store)?;
        return Ok(
          Redirect::to(&urls::detail_url(&country.iso, SLUG, link.id))
            .into_response(),
        );
      }
      errors
    }
    Err(errors) => errors,
  };

  let fields = form_fields(&state, &country.iso, &form).await?;
  Ok(form_page(
    &nav(&country.iso),
    "New interlink",
    &urls::new_url(&country.iso, SLUG),
    &fields,
    &errors,
    &urls::section_url(&country.iso, SLUG),
  ))
}

async fn edit_form<S>(
  State(state): State<AppState<S>>,
  CurrentCountry(country): CurrentCountry,
  Path(IdPath { id }): Path<IdPath>,
  _auth: Authenticated,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let link = state
    .store
    .get_interlink(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  let form = InterlinkForm::from(&link);
  let fields = form_fields(&state, &country.iso, &form).await?;
  Ok(form_page(
    &nav(&country.iso),
    "Edit interlink",
    &urls::edit_url(&country.iso, SLUG, id),
    &fields,
    &FormErrors::default(),
    &urls::detail_url(&country.iso, SLUG, id),
  ))
}

async fn update<S>(
  State(state): State<AppState<S>>,
  CurrentCountry(country): CurrentCountry,
  Path(IdPath { id }): Path<IdPath>,
  _auth: Authenticated,
  Form(form): Form<InterlinkForm>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  state
    .store
    .get_interlink(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  let errors = match form.validate() {
    Ok(fields) => {
      let mut errors = FormErrors::default();
      check_references(&state, &country.iso, &fields, &mut errors).await?;
      if errors.is_empty() {
        let updated = state
          .store
          .update_interlink(&country.iso, id, fields)
          .await
          .map_err(Error::store)?;
        if !updated {
          return Err(Error::NotFound);
        }
        return Ok(
          Redirect::to(&urls::detail_url(&country.iso, SLUG, id)).into_response(),
        );
      }
      errors
    }
    Err(errors) => errors,
  };

  let fields = form_fields(&state, &country.iso, &form).await?;
  Ok(form_page(
    &nav(&country.iso),
    "Edit interlink",
    &urls::edit_url(&country.iso, SLUG, id),
    &fields,
    &errors,
    &urls::detail_url(&country.iso, SLUG, id),
  ))
}

async fn delete_confirm<S>(
  State(state): State<AppState<S>>,
  CurrentCountry(country): CurrentCountry,
  Path(IdPath { id }): Path<IdPath>,
  _auth: Authenticated,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let link = state
    .store
    .get_interlink(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;
  let labels = labels(&state, &country.iso).await?;
  let label = labels
    .gmts
    .get(&link.gmt_id)
    .cloned()
    .unwrap_or_else(|| link.gmt_id.to_string());

  Ok(confirm_page(
    &nav(&country.iso),
    "Delete interlink",
    &label,
    &urls::delete_url(&country.iso, SLUG, id),
    &urls::detail_url(&country.iso, SLUG, id),
  ))
}

async fn delete<S>(
  State(state): State<AppState<S>>,
  CurrentCountry(country): CurrentCountry,
  Path(IdPath { id }): Path<IdPath>,
  _auth: Authenticated,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  state
    .store
    .get_interlink(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  match state
    .store
    .delete_interlink(&country.iso, id)
    .await
    .map_err(Error::store)?
  {
    DeleteOutcome::Deleted => {
      Ok(Redirect::to(&urls::section_url(&country.iso, SLUG)).into_response())
    }
    DeleteOutcome::NotFound => Err(Error::NotFound),
    DeleteOutcome::Protected => Err(Error::Protected(format!("interlink {id}"))),
  }
}
