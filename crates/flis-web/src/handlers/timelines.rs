//! Screens for timelines. Unpaginated.

use axum::{
  Form, Router,
  extract::{Path, State},
  response::{Html, IntoResponse, Redirect, Response},
  routing::get,
};

use flis_core::{
  display::{DetailRow, DetailTable, FieldValue},
  store::{DeleteOutcome, FlisStore},
  timeline::Timeline,
};

use crate::{
  AppState,
  auth::Authenticated,
  error::Error,
  forms::{FormErrors, TimelineForm},
  html::{FormField, PageBuilder, Widget},
  tenancy::CurrentCountry,
  urls,
};

use super::{IdPath, confirm_page, country_options, form_page, list_page, nav};

pub const SLUG: &str = "timelines";

pub fn routes<S>() -> Router<AppState<S>>
where
  S: FlisStore + Clone + 'static,
{
  Router::new()
    .route("/timelines/", get(list::<S>))
    .route("/timelines/new", get(new_form::<S>).post(create::<S>))
    .route("/timelines/{id}", get(detail::<S>))
    .route("/timelines/{id}/edit", get(edit_form::<S>).post(update::<S>))
    .route(
      "/timelines/{id}/delete",
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
    .list_timelines(&country.iso)
    .await
    .map_err(Error::store)?;

  let cells: Vec<Vec<FieldValue>> = rows
    .iter()
    .map(|t| {
      vec![FieldValue::link(
        urls::detail_url(&country.iso, SLUG, t.id),
        t.title.clone(),
      )]
    })
    .collect();

  Ok(list_page(
    &nav(&country.iso),
    &format!("Timelines ({})", country.iso),
    &urls::new_url(&country.iso, SLUG),
    "New timeline",
    &["Title"],
    &cells,
    None,
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
  let timeline = state
    .store
    .get_timeline(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  let mut page = PageBuilder::new(&format!("Timeline: {}", timeline.label()));
  page.nav(&nav(&country.iso));
  page.detail_table(&detail_table(&timeline));
  page.action_link(&urls::edit_url(&country.iso, SLUG, id), "Edit");
  page.action_link(&urls::delete_url(&country.iso, SLUG, id), "Delete");
  Ok(Html(page.finish()).into_response())
}

fn detail_table(timeline: &Timeline) -> DetailTable {
  DetailTable {
    rows:       vec![
      DetailRow::new("Country", FieldValue::text(timeline.country.clone())),
      DetailRow::new("Title", FieldValue::text(timeline.title.clone())),
    ],
    source_url: None,
  }
}

async fn form_fields<S>(
  state: &AppState<S>,
  form: &TimelineForm,
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
      name:   "title",
      label:  "Title",
      widget: Widget::text(form.title.clone()),
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
  let form = TimelineForm::default();
  let fields = form_fields(&state, &form).await?;
  Ok(form_page(
    &nav(&country.iso),
    "New timeline",
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
  Form(form): Form<TimelineForm>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  match form.validate() {
    Ok(fields) => {
      let timeline = state.store.add_timeline(fields).await.map_err(Error::store)?;
      Ok(
        Redirect::to(&urls::detail_url(&country.iso, SLUG, timeline.id))
          .into_response(),
      )
    }
    Err(errors) => {
      let fields = form_fields(&state, &form).await?;
      Ok(form_page(
        &nav(&country.iso),
        "New timeline",
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
  let timeline = state
    .store
    .get_timeline(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  let form = TimelineForm::from(&timeline);
  let fields = form_fields(&state, &form).await?;
  Ok(form_page(
    &nav(&country.iso),
    &format!("Edit timeline: {}", timeline.label()),
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
  Form(form): Form<TimelineForm>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  state
    .store
    .get_timeline(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  match form.validate() {
    Ok(fields) => {
      let updated = state
        .store
        .update_timeline(&country.iso, id, fields)
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
        "Edit timeline",
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
  let timeline = state
    .store
    .get_timeline(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  Ok(confirm_page(
    &nav(&country.iso),
    "Delete timeline",
    timeline.label(),
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
  let timeline = state
    .store
    .get_timeline(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  match state
    .store
    .delete_timeline(&country.iso, id)
    .await
    .map_err(Error::store)?
  {
    DeleteOutcome::Deleted => {
      Ok(Redirect::to(&urls::section_url(&country.iso, SLUG)).into_response())
    }
    DeleteOutcome::NotFound => Err(Error::NotFound),
    DeleteOutcome::Protected => {
      Err(Error::Protected(format!("timeline \"{}\"", timeline.label())))
    }
  }
}
