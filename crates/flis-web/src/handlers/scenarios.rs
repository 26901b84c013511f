//! Screens for scenarios. Unpaginated.

use axum::{
  Form, Router,
  extract::{Path, State},
  response::{Html, IntoResponse, Redirect, Response},
  routing::get,
};

use flis_core::{
  display::{DetailRow, DetailTable, FieldValue},
  scenario::Scenario,
  store::{DeleteOutcome, FlisStore},
};

use crate::{
  AppState,
  auth::Authenticated,
  error::Error,
  forms::{FormErrors, ScenarioForm},
  html::{FormField, PageBuilder, Widget},
  tenancy::CurrentCountry,
  urls,
};

use super::{IdPath, confirm_page, country_options, form_page, list_page, nav};

pub const SLUG: &str = "scenarios";

pub fn routes<S>() -> Router<AppState<S>>
where
  S: FlisStore + Clone + 'static,
{
  Router::new()
    .route("/scenarios/", get(list::<S>))
    .route("/scenarios/new", get(new_form::<S>).post(create::<S>))
    .route("/scenarios/{id}", get(detail::<S>))
    .route("/scenarios/{id}/edit", get(edit_form::<S>).post(update::<S>))
    .route(
      "/scenarios/{id}/delete",
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
    .list_scenarios(&country.iso)
    .await
    .map_err(Error::store)?;

  let cells: Vec<Vec<FieldValue>> = rows
    .iter()
    .map(|s| {
      vec![
        FieldValue::link(urls::detail_url(&country.iso, SLUG, s.id), s.code.clone()),
        FieldValue::text(s.description.clone()),
      ]
    })
    .collect();

  Ok(list_page(
    &nav(&country.iso),
    &format!("Scenarios ({})", country.iso),
    &urls::new_url(&country.iso, SLUG),
    "New scenario",
    &["Code", "Description"],
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
  let scenario = state
    .store
    .get_scenario(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  let mut page = PageBuilder::new(&format!("Scenario: {}", scenario.code));
  page.nav(&nav(&country.iso));
  page.detail_table(&detail_table(&scenario));
  page.action_link(&urls::edit_url(&country.iso, SLUG, id), "Edit");
  page.action_link(&urls::delete_url(&country.iso, SLUG, id), "Delete");
  Ok(Html(page.finish()).into_response())
}

fn detail_table(scenario: &Scenario) -> DetailTable {
  DetailTable {
    rows:       vec![
      DetailRow::new("Country", FieldValue::text(scenario.country.clone())),
      DetailRow::new("Code", FieldValue::text(scenario.code.clone())),
      DetailRow::new("Description", FieldValue::text(scenario.description.clone())),
    ],
    source_url: None,
  }
}

async fn form_fields<S>(
  state: &AppState<S>,
  form: &ScenarioForm,
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
      name:   "code",
      label:  "Code",
      widget: Widget::text(form.code.clone()),
    },
    FormField {
      name:   "description",
      label:  "Description",
      widget: Widget::text(form.description.clone()),
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
  let form = ScenarioForm::default();
  let fields = form_fields(&state, &form).await?;
  Ok(form_page(
    &nav(&country.iso),
    "New scenario",
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
  Form(form): Form<ScenarioForm>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  match form.validate() {
    Ok(fields) => {
      let scenario = state.store.add_scenario(fields).await.map_err(Error::store)?;
      Ok(
        Redirect::to(&urls::detail_url(&country.iso, SLUG, scenario.id))
          .into_response(),
      )
    }
    Err(errors) => {
      let fields = form_fields(&state, &form).await?;
      Ok(form_page(
        &nav(&country.iso),
        "New scenario",
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
  let scenario = state
    .store
    .get_scenario(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  let form = ScenarioForm::from(&scenario);
  let fields = form_fields(&state, &form).await?;
  Ok(form_page(
    &nav(&country.iso),
    &format!("Edit scenario: {}", scenario.code),
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
  Form(form): Form<ScenarioForm>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  state
    .store
    .get_scenario(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  match form.validate() {
    Ok(fields) => {
      let updated = state
        .store
        .update_scenario(&country.iso, id, fields)
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
        "Edit scenario",
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
  let scenario = state
    .store
    .get_scenario(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  Ok(confirm_page(
    &nav(&country.iso),
    "Delete scenario",
    &scenario.label(),
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
  let scenario = state
    .store
    .get_scenario(&country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  match state
    .store
    .delete_scenario(&country.iso, id)
    .await
    .map_err(Error::store)?
  {
    DeleteOutcome::Deleted => {
      Ok(Redirect::to(&urls::section_url(&country.iso, SLUG)).into_response())
    }
    DeleteOutcome::NotFound => Err(Error::NotFound),
    DeleteOutcome::Protected => {
      Err(Error::Protected(format!("scenario \"{}\"", scenario.label())))
    }
  }
}
