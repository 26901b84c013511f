//! Country management screens.
//!
//! These live under `/management` and are deliberately outside the tenancy
//! middleware: there is no current country while administering the tenants
//! themselves.

use axum::{
  Form, Router,
  extract::{Path, State},
  response::{IntoResponse, Redirect, Response},
  routing::get,
};
use serde::Deserialize;

use flis_core::{
  display::FieldValue,
  store::{DeleteOutcome, FlisStore},
};

use crate::{
  AppState,
  auth::Authenticated,
  error::Error,
  forms::{CountryForm, FormErrors, REQUIRED},
  html::{FormField, Widget},
  urls,
};

use super::{confirm_page, form_page, list_page};

#[derive(Debug, Deserialize)]
struct IsoPath {
  iso: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RenameForm {
  name: String,
}

pub fn routes<S>() -> Router<AppState<S>>
where
  S: FlisStore + Clone + 'static,
{
  Router::new()
    .route("/", get(list::<S>))
    .route("/new", get(new_form::<S>).post(create::<S>))
    .route("/{iso}/edit", get(edit_form::<S>).post(update::<S>))
    .route("/{iso}/delete", get(delete_confirm::<S>).post(delete::<S>))
}

fn management_nav() -> Vec<(String, String)> {
  vec![
    ("/".to_string(), "Home".to_string()),
    (urls::management::countries_url(), "Countries".to_string()),
  ]
}

async fn list<S>(State(state): State<AppState<S>>) -> Result<Response, Error>
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
        FieldValue::link(urls::management::edit_country_url(&c.iso), "Edit".to_string()),
        FieldValue::link(
          urls::management::delete_country_url(&c.iso),
          "Delete".to_string(),
        ),
      ]
    })
    .collect();

  Ok(list_page(
    &management_nav(),
    "Countries",
    &urls::management::new_country_url(),
    "New country",
    &["ISO", "Name", "", ""],
    &cells,
    None,
  ))
}

fn form_fields(form: &CountryForm) -> Vec<FormField> {
  vec![
    FormField {
      name:   "iso",
      label:  "ISO",
      widget: Widget::text(form.iso.clone()),
    },
    FormField {
      name:   "name",
      label:  "Name",
      widget: Widget::text(form.name.clone()),
    },
  ]
}

async fn new_form<S>(
  State(_state): State<AppState<S>>,
  _auth: Authenticated,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  Ok(form_page(
    &management_nav(),
    "New country",
    &urls::management::new_country_url(),
    &form_fields(&CountryForm::default()),
    &FormErrors::default(),
    &urls::management::countries_url(),
  ))
}

async fn create<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Form(form): Form<CountryForm>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let errors = match form.validate() {
    Ok(fields) => {
      let created = state.store.add_country(fields).await.map_err(Error::store)?;
      if created {
        return Ok(
          Redirect::to(&urls::management::countries_url()).into_response(),
        );
      }
      let mut errors = FormErrors::default();
      errors.add("iso", "A country with this ISO code already exists.");
      errors
    }
    Err(errors) => errors,
  };

  Ok(form_page(
    &management_nav(),
    "New country",
    &urls::management::new_country_url(),
    &form_fields(&form),
    &errors,
    &urls::management::countries_url(),
  ))
}

async fn edit_form<S>(
  State(state): State<AppState<S>>,
  Path(IsoPath { iso }): Path<IsoPath>,
  _auth: Authenticated,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let country = state
    .store
    .get_country(&iso)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  // The ISO code is the primary key; only the name is editable.
  let fields = vec![FormField {
    name:   "name",
    label:  "Name",
    widget: Widget::text(country.name.clone()),
  }];
  Ok(form_page(
    &management_nav(),
    &format!("Edit country: {iso}"),
    &urls::management::edit_country_url(&iso),
    &fields,
    &FormErrors::default(),
    &urls::management::countries_url(),
  ))
}

async fn update<S>(
  State(state): State<AppState<S>>,
  Path(IsoPath { iso }): Path<IsoPath>,
  _auth: Authenticated,
  Form(form): Form<RenameForm>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  if form.name.is_empty() {
    let mut errors = FormErrors::default();
    errors.add("name", REQUIRED);
    let fields = vec![FormField {
      name:   "name",
      label:  "Name",
      widget: Widget::text(form.name.clone()),
    }];
    return Ok(form_page(
      &management_nav(),
      &format!("Edit country: {iso}"),
      &urls::management::edit_country_url(&iso),
      &fields,
      &errors,
      &urls::management::countries_url(),
    ));
  }

  let updated = state
    .store
    .update_country(&iso, &form.name)
    .await
    .map_err(Error::store)?;
  if !updated {
    return Err(Error::NotFound);
  }
  Ok(Redirect::to(&urls::management::countries_url()).into_response())
}

async fn delete_confirm<S>(
  State(state): State<AppState<S>>,
  Path(IsoPath { iso }): Path<IsoPath>,
  _auth: Authenticated,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let country = state
    .store
    .get_country(&iso)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  Ok(confirm_page(
    &management_nav(),
    "Delete country",
    country.label(),
    &urls::management::delete_country_url(&iso),
    &urls::management::countries_url(),
  ))
}

async fn delete<S>(
  State(state): State<AppState<S>>,
  Path(IsoPath { iso }): Path<IsoPath>,
  _auth: Authenticated,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  match state.store.delete_country(&iso).await.map_err(Error::store)? {
    DeleteOutcome::Deleted => {
      Ok(Redirect::to(&urls::management::countries_url()).into_response())
    }
    DeleteOutcome::NotFound => Err(Error::NotFound),
    DeleteOutcome::Protected => {
      Err(Error::Protected(format!("country \"{iso}\"")))
    }
  }
}
