//! Screens for indicators.
//!
//! The busiest form of the catalogue: five reference selects over the
//! tenant's lookup tables, timelines and sources. Unpaginated, like the
//! other lookup-heavy sections.

use axum::{
  Form, Router,
  extract::{Path, State},
  response::{Html, IntoResponse, Redirect, Response},
  routing::get,
};

use flis_core::{
  category::{Category, CategoryKind},
  display::{DetailRow, DetailTable, FieldValue},
  indicator::{Indicator, NewIndicator},
  source::Source,
  store::{DeleteOutcome, FlisStore},
  timeline::Timeline,
};

use crate::{
  AppState,
  auth::Authenticated,
  error::Error,
  forms::{FormErrors, INVALID_CHOICE, IndicatorForm},
  html::{FormField, PageBuilder, Widget},
  tenancy::CurrentCountry,
  urls,
};

use super::{
  IdPath, confirm_page, country_options, file_value, form_page, list_page, nav,
  sources::all_sources,
};

pub const SLUG: &str = "indicators";

pub fn routes<S>() -> Router<AppState<S>>
where
  S: FlisStore + Clone + 'static,
{
  Router::new()
    .route("/indicators/", get(list::<S>))
    .route("/indicators/new", get(new_form::<S>).post(create::<S>))
    .route("/indicators/{id}", get(detail::<S>))
    .route("/indicators/{id}/edit", get(edit_form::<S>).post(update::<S>))
    .route(
      "/indicators/{id}/delete",
      get(delete_confirm::<S>).post(delete::<S>),
    )
}

async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentCountry(country): CurrentCountry,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let rows = state
    .store
    .list_indicators(&country.iso)
    .await
    .map_err(Error::store)?;

  let cells: Vec<Vec<FieldValue>> = rows
    .iter()
    .map(|i| {
      vec![
        FieldValue::link(urls::detail_url(&country.iso, SLUG, i.id), i.code.clone()),
        FieldValue::text(i.description.clone()),
        FieldValue::text(i.base_year.clone()),
        FieldValue::text(i.end_year.clone()),
      ]
    })
    .collect();

  Ok(list_page(
    &nav(&country.iso),
    &format!("Indicators ({})", country.iso),
    &urls::new_url(&country.iso, SLUG),
    "New indicator",
    &["Code", "Description", "Base year", "End year"],
    &cells,
    None,
  ))
}

/// The related rows an indicator detail screen resolves for display.
struct Related {
  thematic_category:     Option<Category>,
  geographical_scale:    Option<Category>,
  geographical_coverage: Option<Category>,
  timeline:              Option<Timeline>,
  source:                Option<Source>,
}

async fn related<S>(
  state: &AppState<S>,
  country: &str,
  indicator: &Indicator,
) -> Result<Related, Error>
where
  S: FlisStore + Clone + 'static,
{
  let thematic_category = state
    .store
    .get_category(CategoryKind::Thematic, country, indicator.thematic_category_id)
    .await
    .map_err(Error::store)?;

  let geographical_scale = match indicator.geographical_scale_id {
    Some(id) => state
      .store
      .get_category(CategoryKind::GeographicalScale, country, id)
      .await
      .map_err(Error::store)?,
    None => None,
  };

  let geographical_coverage = match indicator.geographical_coverage_id {
    Some(id) => state
      .store
      .get_category(CategoryKind::GeographicalCoverage, country, id)
      .await
      .map_err(Error::store)?,
    None => None,
  };

  let timeline = state
    .store
    .get_timeline(country, indicator.timeline_id)
    .await
    .map_err(Error::store)?;

  let source = state
    .store
    .get_source(country, indicator.source_id)
    .await
    .map_err(Error::store)?;

  Ok(Related {
    thematic_category,
    geographical_scale,
    geographical_coverage,
    timeline,
    source,
  })
}

async fn detail<S>(
  State(state): State<AppState<S>>,
  CurrentCountry(country): CurrentCountry,
  Path(IdPath { id }): Path<IdPath>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let indicator = state
    .store
    .get_indicator(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;
  let related = related(&state, &country.iso, &indicator).await?;

  let mut page = PageBuilder::new(&format!("Indicator: {}", indicator.label()));
  page.nav(&nav(&country.iso));
  page.detail_table(&detail_table(&indicator, &related, &state.config.hostname));
  page.action_link(&urls::edit_url(&country.iso, SLUG, id), "Edit");
  page.action_link(&urls::delete_url(&country.iso, SLUG, id), "Delete");
  Ok(Html(page.finish()).into_response())
}

fn detail_table(indicator: &Indicator, related: &Related, hostname: &str) -> DetailTable {
  DetailTable {
    rows:       vec![
      DetailRow::new("Country", FieldValue::text(indicator.country.clone())),
      DetailRow::new("Code", FieldValue::text(indicator.code.clone())),
      DetailRow::new("Description", FieldValue::text(indicator.description.clone())),
      DetailRow::new(
        "Thematic category",
        FieldValue::opt(related.thematic_category.as_ref().map(Category::label)),
      ),
      DetailRow::new(
        "Geographical scale",
        FieldValue::opt(related.geographical_scale.as_ref().map(Category::label)),
      ),
      DetailRow::new(
        "Geographical coverage",
        FieldValue::opt(related.geographical_coverage.as_ref().map(Category::label)),
      ),
      DetailRow::new(
        "Timeline",
        FieldValue::opt(related.timeline.as_ref().map(|t| t.label().to_string())),
      ),
      DetailRow::new(
        "Source",
        FieldValue::opt(related.source.as_ref().map(|s| s.label().to_string())),
      ),
      DetailRow::new("Base year", FieldValue::text(indicator.base_year.clone())),
      DetailRow::new("End year", FieldValue::text(indicator.end_year.clone())),
      DetailRow::new("Ownership", FieldValue::text(indicator.ownership.clone())),
      DetailRow::new("File", file_value(hostname, indicator.file_path.as_deref())),
    ],
    source_url: related.source.as_ref().map(|s| s.url.clone()),
  }
}

fn category_options(categories: &[Category]) -> Vec<(String, String)> {
  categories
    .iter()
    .map(|c| (c.id.to_string(), c.label()))
    .collect()
}

async fn form_fields<S>(
  state: &AppState<S>,
  country: &str,
  form: &IndicatorForm,
) -> Result<Vec<FormField>, Error>
where
  S: FlisStore + Clone + 'static,
{
  let countries = state.store.list_countries().await.map_err(Error::store)?;
  let thematic = state
    .store
    .list_categories(CategoryKind::Thematic, country)
    .await
    .map_err(Error::store)?;
  let scales = state
    .store
    .list_categories(CategoryKind::GeographicalScale, country)
    .await
    .map_err(Error::store)?;
  let coverages = state
    .store
    .list_categories(CategoryKind::GeographicalCoverage, country)
    .await
    .map_err(Error::store)?;
  let timelines = state
    .store
    .list_timelines(country)
    .await
    .map_err(Error::store)?;
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
      name:   "thematic_category",
      label:  "Thematic category",
      widget: Widget::select(category_options(&thematic), form.thematic_category.clone()),
    },
    FormField {
      name:   "geographical_scale",
      label:  "Geographical scale",
      widget: Widget::select(category_options(&scales), form.geographical_scale.clone()),
    },
    FormField {
      name:   "geographical_coverage",
      label:  "Geographical coverage",
      widget: Widget::select(
        category_options(&coverages),
        form.geographical_coverage.clone(),
      ),
    },
    FormField {
      name:   "timeline",
      label:  "Timeline",
      widget: Widget::select(
        timelines
          .iter()
          .map(|t| (t.id.to_string(), t.title.clone()))
          .collect(),
        form.timeline.clone(),
      ),
    },
    FormField {
      name:   "source",
      label:  "Source",
      widget: Widget::select(
        sources
          .iter()
          .map(|s| (s.id.to_string(), s.label().to_string()))
          .collect(),
        form.source.clone(),
      ),
    },
    FormField {
      name:   "base_year",
      label:  "Base year",
      widget: Widget::text(form.base_year.clone()),
    },
    FormField {
      name:   "end_year",
      label:  "End year",
      widget: Widget::text(form.end_year.clone()),
    },
    FormField {
      name:   "ownership",
      label:  "Ownership",
      widget: Widget::text(form.ownership.clone()),
    },
    FormField {
      name:   "file_path",
      label:  "File",
      widget: Widget::text(form.file_path.clone()),
    },
  ])
}

async fn check_references<S>(
  state: &AppState<S>,
  country: &str,
  fields: &NewIndicator,
  errors: &mut FormErrors,
) -> Result<(), Error>
where
  S: FlisStore + Clone + 'static,
{
  if state
    .store
    .get_category(CategoryKind::Thematic, country, fields.thematic_category_id)
    .await
    .map_err(Error::store)?
    .is_none()
  {
    errors.add("thematic_category", INVALID_CHOICE);
  }
  if let Some(id) = fields.geographical_scale_id
    && state
      .store
      .get_category(CategoryKind::GeographicalScale, country, id)
      .await
      .map_err(Error::store)?
      .is_none()
  {
    errors.add("geographical_scale", INVALID_CHOICE);
  }
  if let Some(id) = fields.geographical_coverage_id
    && state
      .store
      .get_category(CategoryKind::GeographicalCoverage, country, id)
      .await
      .map_err(Error::store)?
      .is_none()
  {
    errors.add("geographical_coverage", INVALID_CHOICE);
  }
  if state
    .store
    .get_timeline(country, fields.timeline_id)
    .await
    .map_err(Error::store)?
    .is_none()
  {
    errors.add("timeline", INVALID_CHOICE);
  }
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
  let form = IndicatorForm::default();
  let fields = form_fields(&state, &country.iso, &form).await?;
  Ok(form_page(
    &nav(&country.iso),
    "New indicator",
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
  Form(form): Form<IndicatorForm>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let errors = match form.validate() {
    Ok(fields) => {
      let mut errors = FormErrors::default();
      check_references(&state, &country.iso, &fields, &mut errors).await?;
      if errors.is_empty() {
        let indicator =
          state.store.add_indicator(fields).await.map_err(Error::store)?;
        return Ok(
          Redirect::to(&urls::detail_url(&country.iso, SLUG, indicator.id))
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
    "New indicator",
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
  let indicator = state
    .store
    .get_indicator(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  let form = IndicatorForm::from(&indicator);
  let fields = form_fields(&state, &country.iso, &form).await?;
  Ok(form_page(
    &nav(&country.iso),
    &format!("Edit indicator: {}", indicator.label()),
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
  Form(form): Form<IndicatorForm>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  state
    .store
    .get_indicator(&country.iso, id)
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
          .update_indicator(&country.iso, id, fields)
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
    "Edit indicator",
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
  let indicator = state
    .store
    .get_indicator(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  Ok(confirm_page(
    &nav(&country.iso),
    "Delete indicator",
    indicator.label(),
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
  let indicator = state
    .store
    .get_indicator(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  match state
    .store
    .delete_indicator(&country.iso, id)
    .await
    .map_err(Error::store)?
  {
    DeleteOutcome::Deleted => {
      Ok(Redirect::to(&urls::section_url(&country.iso, SLUG)).into_response())
    }
    DeleteOutcome::NotFound => Err(Error::NotFound),
    DeleteOutcome::Protected => {
      Err(Error::Protected(format!("indicator \"{}\"", indicator.label())))
    }
  }
}
