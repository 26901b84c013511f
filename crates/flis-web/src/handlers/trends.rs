//! Screens for trends.

use axum::{
  Form, Router,
  extract::{Path, Query, State},
  response::{Html, IntoResponse, Redirect, Response},
  routing::get,
};

use flis_core::{
  display::{DetailRow, DetailTable, FieldValue},
  source::Source,
  store::{DeleteOutcome, FlisStore},
  trend::{NewTrend, Trend},
};

use crate::{
  AppState,
  auth::Authenticated,
  error::Error,
  forms::{FormErrors, INVALID_CHOICE, TrendForm},
  html::{FormField, PageBuilder, Widget},
  tenancy::CurrentCountry,
  urls,
};

use super::{
  IdPath, PageParams, confirm_page, country_options, file_value, form_page,
  list_page, nav, paginate, sources::all_sources,
};

pub const SLUG: &str = "trends";

pub fn routes<S>() -> Router<AppState<S>>
where
  S: FlisStore + Clone + 'static,
{
  Router::new()
    .route("/trends/", get(list::<S>))
    .route("/trends/new", get(new_form::<S>).post(create::<S>))
    .route("/trends/{id}", get(detail::<S>))
    .route("/trends/{id}/edit", get(edit_form::<S>).post(update::<S>))
    .route("/trends/{id}/delete", get(delete_confirm::<S>).post(delete::<S>))
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
    .count_trends(&country.iso)
    .await
    .map_err(Error::store)?;
  let (query, pagination) = paginate(total, params.page)?;
  let rows = state
    .store
    .list_trends(&country.iso, query)
    .await
    .map_err(Error::store)?;

  let cells: Vec<Vec<FieldValue>> = rows
    .iter()
    .map(|t| {
      vec![
        FieldValue::link(urls::detail_url(&country.iso, SLUG, t.id), t.code.clone()),
        FieldValue::text(t.description.clone()),
        FieldValue::text(t.ownership.clone()),
      ]
    })
    .collect();

  Ok(list_page(
    &nav(&country.iso),
    &format!("Trends ({})", country.iso),
    &urls::new_url(&country.iso, SLUG),
    "New trend",
    &["Code", "Description", "Ownership"],
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
  let trend = state
    .store
    .get_trend(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;
  let source = state
    .store
    .get_source(&country.iso, trend.source_id)
    .await
    .map_err(Error::store)?;

  let mut page = PageBuilder::new(&format!("Trend: {}", trend.label()));
  page.nav(&nav(&country.iso));
  page.detail_table(&detail_table(&trend, source.as_ref(), &state.config.hostname));
  page.action_link(&urls::edit_url(&country.iso, SLUG, id), "Edit");
  page.action_link(&urls::delete_url(&country.iso, SLUG, id), "Delete");
  Ok(Html(page.finish()).into_response())
}

fn detail_table(trend: &Trend, source: Option<&Source>, hostname: &str) -> DetailTable {
  DetailTable {
    rows:       vec![
      DetailRow::new("Country", FieldValue::text(trend.country.clone())),
      DetailRow::new("Code", FieldValue::text(trend.code.clone())),
      DetailRow::new("Description", FieldValue::text(trend.description.clone())),
      DetailRow::new(
        "Source",
        FieldValue::opt(source.map(|s| s.label().to_string())),
      ),
      DetailRow::new("Ownership", FieldValue::text(trend.ownership.clone())),
      DetailRow::new("Summary", FieldValue::text(trend.summary.clone())),
      DetailRow::new("File", file_value(hostname, trend.file_path.as_deref())),
    ],
    source_url: source.map(|s| s.url.clone()),
  }
}

fn source_options(sources: &[Source]) -> Vec<(String, String)> {
  sources
    .iter()
    .map(|s| (s.id.to_string(), s.label().to_string()))
    .collect()
}

async fn form_fields<S>(
  state: &AppState<S>,
  country: &str,
  form: &TrendForm,
) -> Result<Vec<FormField>, Error>
where
  S: FlisStore + Clone + 'static,
{
  let countries = state.store.list_countries().await.map_err(Error::store)?;
  let sources = all_sources(state, country).await?;
  Ok(vec![
    FormField {
      name:   "country",
      label:  "Country",
      widget: Widget::select(country_options(&countries), form.country.clone()),
    },
    FormField {
      name:   "code",
      label:  "Code",
      widget: Widget::text(form.code.clone()),
    },
    FormField {
      name:   "description",
      label:  "Description",
      widget: Widget::text(form.description.clone()),
    },
    FormField {
      name:   "source",
      label:  "Source",
      widget: Widget::select(source_options(&sources), form.source.clone()),
    },
    FormField {
      name:   "ownership",
      label:  "Ownership",
      widget: Widget::text(form.ownership.clone()),
    },
    FormField {
      name:   "summary",
      label:  "Summary",
      widget: Widget::textarea(form.summary.clone()),
    },
    FormField {
      name:   "file_path",
      label:  "File",
      widget: Widget::text(form.file_path.clone()),
    },
  ])
}

/// The source select only offers the tenant's rows; anything else submitted
/// is an invalid choice.
async fn check_references<S>(
  state: &AppState<S>,
  country: &str,
  fields: &NewTrend,
  errors: &mut FormErrors,
) -> Result<(), Error>
where
  S: FlisStore + Clone + 'static,
{
  if state
    .store
    .get_source(country, fields.source_id)
    .await
    .map_err(Error::store)?
    .is_none()
  {
    errors.add("source", INVALID_CHOICE);
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
  let form = TrendForm::default();
  let fields = form_fields(&state, &country.iso, &form).await?;
  Ok(form_page(
    &nav(&country.iso),
    "New trend",
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
  Form(form): Form<TrendForm>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let errors = match form.validate() {
    Ok(fields) => {
      let mut errors = FormErrors::default();
      check_references(&state, &country.iso, &fields, &mut errors).await?;
      if errors.is_empty() {
        let trend = state.store.add_trend(fields).await.map_err(Error::store)?;
        return Ok(
          Redirect::to(&urls::detail_url(&country.iso, SLUG, trend.id))
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
    "New trend",
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
  let trend = state
    .store
    .get_trend(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  let form = TrendForm::from(&trend);
  let fields = form_fields(&state, &country.iso, &form).await?;
  Ok(form_page(
    &nav(&country.iso),
    &format!("Edit trend: {}", trend.label()),
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
  Form(form): Form<TrendForm>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  state
    .store
    .get_trend(&country.iso, id)
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
          .update_trend(&country.iso, id, fields)
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
    "Edit trend",
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
  let trend = state
    .store
    .get_trend(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  Ok(confirm_page(
    &nav(&country.iso),
    "Delete trend",
    trend.label(),
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
  let trend = state
    .store
    .get_trend(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  match state
    .store
    .delete_trend(&country.iso, id)
    .await
    .map_err(Error::store)?
  {
    DeleteOutcome::Deleted => {
      Ok(Redirect::to(&urls::section_url(&country.iso, SLUG)).into_response())
    }
    DeleteOutcome::NotFound => Err(Error::NotFound),
    DeleteOutcome::Protected => {
      Err(Error::Protected(format!("trend \"{}\"", trend.label())))
    }
  }
}
