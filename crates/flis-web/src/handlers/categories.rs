//! Screens for the four lookup-category sections.
//!
//! One handler set serves all kinds; each kind's routes are registered
//! under its own slug with the kind attached as a request extension.
//! These lists are unpaginated.

use axum::{
  Extension, Form, Router,
  extract::{Path, State},
  response::{Html, IntoResponse, Redirect, Response},
  routing::get,
};

use flis_core::{
  category::{Category, CategoryKind},
  display::{DetailRow, DetailTable, FieldValue},
  store::{DeleteOutcome, FlisStore},
};

use crate::{
  AppState,
  auth::Authenticated,
  error::Error,
  forms::{CategoryForm, FormErrors},
  html::{FormField, PageBuilder, Widget},
  tenancy::CurrentCountry,
  urls,
};

use super::{IdPath, confirm_page, country_options, form_page, list_page, nav};

pub fn routes<S>(kind: CategoryKind) -> Router<AppState<S>>
where
  S: FlisStore + Clone + 'static,
{
  let slug = kind.slug();
  Router::new()
    .route(&format!("/{slug}/"), get(list::<S>))
    .route(&format!("/{slug}/new"), get(new_form::<S>).post(create::<S>))
    .route(&format!("/{slug}/{{id}}"), get(detail::<S>))
    .route(
      &format!("/{slug}/{{id}}/edit"),
      get(edit_form::<S>).post(update::<S>),
    )
    .route(
      &format!("/{slug}/{{id}}/delete"),
      get(delete_confirm::<S>).post(delete::<S>),
    )
    .layer(Extension(kind))
}

async fn list<S>(
  State(state): State<AppState<S>>,
  Extension(kind): Extension<CategoryKind>,
  CurrentCountry(country): CurrentCountry,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let rows = state
    .store
    .list_categories(kind, &country.iso)
    .await
    .map_err(Error::store)?;

  let cells: Vec<Vec<FieldValue>> = rows
    .iter()
    .map(|c| {
      vec![
        FieldValue::link(
          urls::detail_url(&country.iso, kind.slug(), c.id),
          c.code.clone(),
        ),
        FieldValue::text(c.description.clone()),
      ]
    })
    .collect();

  Ok(list_page(
    &nav(&country.iso),
    &format!("{} ({})", kind.verbose_name_plural(), country.iso),
    &urls::new_url(&country.iso, kind.slug()),
    &format!("New {}", kind.verbose_name().to_lowercase()),
    &["Code", "Description"],
    &cells,
    None,
  ))
}

async fn detail<S>(
  State(state): State<AppState<S>>,
  Extension(kind): Extension<CategoryKind>,
  CurrentCountry(country): CurrentCountry,
  Path(IdPath { id }): Path<IdPath>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let category = state
    .store
    .get_category(kind, &country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  let mut page =
    PageBuilder::new(&format!("{}: {}", kind.verbose_name(), category.code));
  page.nav(&nav(&country.iso));
  page.detail_table(&detail_table(&category));
  page.action_link(&urls::edit_url(&country.iso, kind.slug(), id), "Edit");
  page.action_link(&urls::delete_url(&country.iso, kind.slug(), id), "Delete");
  Ok(Html(page.finish()).into_response())
}

fn detail_table(category: &Category) -> DetailTable {
  DetailTable {
    rows:       vec![
      DetailRow::new("Country", FieldValue::text(category.country.clone())),
      DetailRow::new("Code", FieldValue::text(category.code.clone())),
      DetailRow::new("Description", FieldValue::text(category.description.clone())),
    ],
    source_url: None,
  }
}

async fn form_fields<S>(
  state: &AppState<S>,
  form: &CategoryForm,
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
  Extension(kind): Extension<CategoryKind>,
  CurrentCountry(country): CurrentCountry,
  _auth: Authenticated,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let form = CategoryForm::default();
  let fields = form_fields(&state, &form).await?;
  Ok(form_page(
    &nav(&country.iso),
    &format!("New {}", kind.verbose_name().to_lowercase()),
    &urls::new_url(&country.iso, kind.slug()),
    &fields,
    &FormErrors::default(),
    &urls::section_url(&country.iso, kind.slug()),
  ))
}

async fn create<S>(
  State(state): State<AppState<S>>,
  Extension(kind): Extension<CategoryKind>,
  CurrentCountry(country): CurrentCountry,
  _auth: Authenticated,
  Form(form): Form<CategoryForm>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  match form.validate() {
    Ok(fields) => {
      let category = state
        .store
        .add_category(kind, fields)
        .await
        .map_err(Error::store)?;
      Ok(
        Redirect::to(&urls::detail_url(&country.iso, kind.slug(), category.id))
          .into_response(),
      )
    }
    Err(errors) => {
      let fields = form_fields(&state, &form).await?;
      Ok(form_page(
        &nav(&country.iso),
        &format!("New {}", kind.verbose_name().to_lowercase()),
        &urls::new_url(&country.iso, kind.slug()),
        &fields,
        &errors,
        &urls::section_url(&country.iso, kind.slug()),
      ))
    }
  }
}

async fn edit_form<S>(
  State(state): State<AppState<S>>,
  Extension(kind): Extension<CategoryKind>,
  CurrentCountry(country): CurrentCountry,
  Path(IdPath { id }): Path<IdPath>,
  _auth: Authenticated,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let category = state
    .store
    .get_category(kind, &country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  let form = CategoryForm::from(&category);
  let fields = form_fields(&state, &form).await?;
  Ok(form_page(
    &nav(&country.iso),
    &format!("Edit {}: {}", kind.verbose_name().to_lowercase(), category.code),
    &urls::edit_url(&country.iso, kind.slug(), id),
    &fields,
    &FormErrors::default(),
    &urls::detail_url(&country.iso, kind.slug(), id),
  ))
}

async fn update<S>(
  State(state): State<AppState<S>>,
  Extension(kind): Extension<CategoryKind>,
  CurrentCountry(country): CurrentCountry,
  Path(IdPath { id }): Path<IdPath>,
  _auth: Authenticated,
  Form(form): Form<CategoryForm>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  state
    .store
    .get_category(kind, &country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  match form.validate() {
    Ok(fields) => {
      let updated = state
        .store
        .update_category(kind, &country.iso, id, fields)
        .await
        .map_err(Error::store)?;
      if !updated {
        return Err(Error::NotFound);
      }
      Ok(
        Redirect::to(&urls::detail_url(&country.iso, kind.slug(), id))
          .into_response(),
      )
    }
    Err(errors) => {
      let fields = form_fields(&state, &form).await?;
      Ok(form_page(
        &nav(&country.iso),
        &format!("Edit {}", kind.verbose_name().to_lowercase()),
        &urls::edit_url(&country.iso, kind.slug(), id),
        &fields,
        &errors,
        &urls::detail_url(&country.iso, kind.slug(), id),
      ))
    }
  }
}

async fn delete_confirm<S>(
  State(state): State<AppState<S>>,
  Extension(kind): Extension<CategoryKind>,
  CurrentCountry(country): CurrentCountry,
  Path(IdPath { id }): Path<IdPath>,
  _auth: Authenticated,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let category = state
    .store
    .get_category(kind, &country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  Ok(confirm_page(
    &nav(&country.iso),
    &format!("Delete {}", kind.verbose_name().to_lowercase()),
    &category.label(),
    &urls::delete_url(&country.iso, kind.slug(), id),
    &urls::detail_url(&country.iso, kind.slug(), id),
  ))
}

async fn delete<S>(
  State(state): State<AppState<S>>,
  Extension(kind): Extension<CategoryKind>,
  CurrentCountry(country): CurrentCountry,
  Path(IdPath { id }): Path<IdPath>,
  _auth: Authenticated,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let category = state
    .store
    .get_category(kind, &country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  match state
    .store
    .delete_category(kind, &country.iso, id)
    .await
    .map_err(Error::store)?
  {
    DeleteOutcome::Deleted => Ok(
      Redirect::to(&urls::section_url(&country.iso, kind.slug())).into_response(),
    ),
    DeleteOutcome::NotFound => Err(Error::NotFound),
    DeleteOutcome::Protected => Err(Error::Protected(format!(
      "{} \"{}\"",
      kind.verbose_name().to_lowercase(),
      category.label()
    ))),
  }
}
