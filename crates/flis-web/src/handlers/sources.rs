//! Screens for sources.

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
};

use crate::{
  AppState,
  auth::Authenticated,
  error::Error,
  forms::{FormErrors, SourceForm},
  html::{FormField, PageBuilder, Widget},
  tenancy::CurrentCountry,
  urls,
};

use super::{
  ALL, IdPath, PageParams, confirm_page, country_options, form_page, list_page,
  nav, paginate,
};

pub const SLUG: &str = "sources";

pub fn routes<S>() -> Router<AppState<S>>
where
  S: FlisStore + Clone + 'static,
{
  Router::new()
    .route("/sources/", get(list::<S>))
    .route("/sources/new", get(new_form::<S>).post(create::<S>))
    .route("/sources/{id}", get(detail::<S>))
    .route("/sources/{id}/edit", get(edit_form::<S>).post(update::<S>))
    .route("/sources/{id}/delete", get(delete_confirm::<S>).post(delete::<S>))
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
    .count_sources(&country.iso)
    .await
    .map_err(Error::store)?;
  let (query, pagination) = paginate(total, params.page)?;
  let rows = state
    .store
    .list_sources(&country.iso, query)
    .await
    .map_err(Error::store)?;

  let cells: Vec<Vec<FieldValue>> = rows
    .iter()
    .map(|s| {
      vec![
        FieldValue::link(
          urls::detail_url(&country.iso, SLUG, s.id),
          s.short_name.clone(),
        ),
        FieldValue::text(s.long_name.clone()),
        FieldValue::text(s.year_of_publication.clone()),
        FieldValue::text(s.author.clone()),
      ]
    })
    .collect();

  Ok(list_page(
    &nav(&country.iso),
    &format!("Sources ({})", country.iso),
    &urls::new_url(&country.iso, SLUG),
    "New source",
    &["Short name", "Long name", "Year of publication", "Author"],
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
  let source = state
    .store
    .get_source(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  let mut page = PageBuilder::new(&format!("Source: {}", source.label()));
  page.nav(&nav(&country.iso));
  page.detail_table(&detail_table(&source));
  page.action_link(&urls::edit_url(&country.iso, SLUG, id), "Edit");
  page.action_link(&urls::delete_url(&country.iso, SLUG, id), "Delete");
  Ok(Html(page.finish()).into_response())
}

fn detail_table(source: &Source) -> DetailTable {
  DetailTable {
    rows:       vec![
      DetailRow::new("Country", FieldValue::text(source.country.clone())),
      DetailRow::new("Short name", FieldValue::text(source.short_name.clone())),
      DetailRow::new("Long name", FieldValue::text(source.long_name.clone())),
      DetailRow::new(
        "Year of publication",
        FieldValue::text(source.year_of_publication.clone()),
      ),
      DetailRow::new("Author", FieldValue::text(source.author.clone())),
      DetailRow::new("Url", FieldValue::text(source.url.clone())),
      DetailRow::new("Summary", FieldValue::text(source.summary.clone())),
    ],
    source_url: None,
  }
}

async fn form_fields<S>(
  state: &AppState<S>,
  form: &SourceForm,
) -> Result<Vec<FormField>, Error>
where
  S: FlisStore + Clone + 'static,
{
  let countries = state.store.list_countries().await.map_err(Error::store)?;
  Ok(vec![
    FormField {
      name:   "country",
      label:  "Country",
      widget: Widget::select(country_options(&countries), form.country.clone()),
    },
    FormField {
      name:   "short_name",
      label:  "Short name",
      widget: Widget::text(form.short_name.clone()),
    },
    FormField {
      name:   "long_name",
      label:  "Long name",
      widget: Widget::text(form.long_name.clone()),
    },
    FormField {
      name:   "year_of_publication",
      label:  "Year of publication",
      widget: Widget::text(form.year_of_publication.clone()),
    },
    FormField {
      name:   "author",
      label:  "Author",
      widget: Widget::text(form.author.clone()),
    },
    FormField {
      name:   "url",
      label:  "Url",
      widget: Widget::text(form.url.clone()),
    },
    FormField {
      name:   "summary",
      label:  "Summary",
      widget: Widget::textarea(form.summary.clone()),
    },
  ])
}

async fn new_form<S>(
  State(state): State<AppState<S>>,
  CurrentCountry(country): CurrentCountry,
  _auth: Authenticated,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let form = SourceForm::default();
  let fields = form_fields(&state, &form).await?;
  Ok(form_page(
    &nav(&country.iso),
    "New source",
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
  Form(form): Form<SourceForm>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  match form.validate() {
    Ok(fields) => {
      let source = state.store.add_source(fields).await.map_err(Error::store)?;
      Ok(
        Redirect::to(&urls::detail_url(&country.iso, SLUG, source.id))
          .into_response(),
      )
    }
    Err(errors) => {
      let fields = form_fields(&state, &form).await?;
      Ok(form_page(
        &nav(&country.iso),
        "New source",
        &urls::new_url(&country.iso, SLUG),
        &fields,
        &errors,
        &urls::section_url(&country.iso, SLUG),
      ))
    }
  }
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
  let source = state
    .store
    .get_source(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  let form = SourceForm::from(&source);
  let fields = form_fields(&state, &form).await?;
  Ok(form_page(
    &nav(&country.iso),
    &format!("Edit source: {}", source.label()),
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
  Form(form): Form<SourceForm>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  state
    .store
    .get_source(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  match form.validate() {
    Ok(fields) => {
      let updated = state
        .store
        .update_source(&country.iso, id, fields)
        .await
        .map_err(Error::store)?;
      if !updated {
        return Err(Error::NotFound);
      }
      Ok(Redirect::to(&urls::detail_url(&country.iso, SLUG, id)).into_response())
    }
    Err(errors) => {
      let fields = form_fields(&state, &form).await?;
      Ok(form_page(
        &nav(&country.iso),
        "Edit source",
        &urls::edit_url(&country.iso, SLUG, id),
        &fields,
        &errors,
        &urls::detail_url(&country.iso, SLUG, id),
      ))
    }
  }
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
  let source = state
    .store
    .get_source(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  Ok(confirm_page(
    &nav(&country.iso),
    "Delete source",
    source.label(),
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
  let source = state
    .store
    .get_source(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  match state
    .store
    .delete_source(&country.iso, id)
    .await
    .map_err(Error::store)?
  {
    DeleteOutcome::Deleted => {
      Ok(Redirect::to(&urls::section_url(&country.iso, SLUG)).into_response())
    }
    DeleteOutcome::NotFound => Err(Error::NotFound),
    DeleteOutcome::Protected => {
      Err(Error::Protected(format!("source \"{}\"", source.label())))
    }
  }
}

/// Every source of the tenant, for the source selects on sibling sections'
/// forms.
pub(super) async fn all_sources<S>(
  state: &AppState<S>,
  country: &str,
) -> Result<Vec<Source>, Error>
where
  S: FlisStore + Clone + 'static,
{
  state
    .store
    .list_sources(country, ALL)
    .await
    .map_err(Error::store)
}
