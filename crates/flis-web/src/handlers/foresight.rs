//! Screens for the seven foresight sections (GMTs, FLIS models, horizon
//! scannings, methods and tools, uncertainties, wild cards, early
//! warnings).
//!
//! One handler set serves all kinds; each kind's routes are registered
//! under its own slug with the kind attached as a request extension. The
//! URL field is only offered (and required) for kinds that carry one.

use axum::{
  Extension, Form, Router,
  extract::{Path, Query, State},
  response::{Html, IntoResponse, Redirect, Response},
  routing::get,
};

use flis_core::{
  category::{Category, CategoryKind},
  display::{DetailRow, DetailTable, FieldValue},
  foresight::{ForesightItem, ForesightKind, NewForesightItem},
  source::Source,
  store::{DeleteOutcome, FlisStore},
};

use crate::{
  AppState,
  auth::Authenticated,
  error::Error,
  forms::{ForesightForm, FormErrors, INVALID_CHOICE},
  html::{FormField, PageBuilder, Widget},
  tenancy::CurrentCountry,
  urls,
};

use super::{
  IdPath, PageParams, confirm_page, country_options, file_value, form_page,
  list_page, nav, paginate, sources::all_sources,
};

pub fn routes<S>(kind: ForesightKind) -> Router<AppState<S>>
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
  Extension(kind): Extension<ForesightKind>,
  CurrentCountry(country): CurrentCountry,
  Query(params): Query<PageParams>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let total = state
    .store
    .count_foresight(kind, &country.iso)
    .await
    .map_err(Error::store)?;
  let (query, pagination) = paginate(total, params.page)?;
  let rows = state
    .store
    .list_foresight(kind, &country.iso, query)
    .await
    .map_err(Error::store)?;

  let cells: Vec<Vec<FieldValue>> = rows
    .iter()
    .map(|item| {
      vec![
        FieldValue::link(
          urls::detail_url(&country.iso, kind.slug(), item.id),
          item.code.clone(),
        ),
        FieldValue::text(item.description.clone()),
        FieldValue::text(item.ownership.clone()),
      ]
    })
    .collect();

  Ok(list_page(
    &nav(&country.iso),
    &format!("{} ({})", kind.verbose_name_plural(), country.iso),
    &urls::new_url(&country.iso, kind.slug()),
    &format!("New {}", kind.verbose_name()),
    &["Code", "Description", "Ownership"],
    &cells,
    Some((&urls::section_url(&country.iso, kind.slug()), &pagination)),
  ))
}

async fn detail<S>(
  State(state): State<AppState<S>>,
  Extension(kind): Extension<ForesightKind>,
  CurrentCountry(country): CurrentCountry,
  Path(IdPath { id }): Path<IdPath>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let item = state
    .store
    .get_foresight(kind, &country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  let steep = match item.steep_category_id {
    Some(steep_id) => state
      .store
      .get_category(CategoryKind::Steep, &country.iso, steep_id)
      .await
      .map_err(Error::store)?,
    None => None,
  };
  let source = state
    .store
    .get_source(&country.iso, item.source_id)
    .await
    .map_err(Error::store)?;

  let mut page =
    PageBuilder::new(&format!("{}: {}", kind.verbose_name(), item.label()));
  page.nav(&nav(&country.iso));
  page.detail_table(&detail_table(
    &item,
    steep.as_ref(),
    source.as_ref(),
    &state.config.hostname,
  ));
  page.action_link(&urls::edit_url(&country.iso, kind.slug(), id), "Edit");
  page.action_link(&urls::delete_url(&country.iso, kind.slug(), id), "Delete");
  Ok(Html(page.finish()).into_response())
}

fn detail_table(
  item: &ForesightItem,
  steep: Option<&Category>,
  source: Option<&Source>,
  hostname: &str,
) -> DetailTable {
  let mut rows = vec![
    DetailRow::new("Country", FieldValue::text(item.country.clone())),
    DetailRow::new("Code", FieldValue::text(item.code.clone())),
    DetailRow::new(
      "Steep Category",
      FieldValue::opt(steep.map(Category::label)),
    ),
    DetailRow::new("Description", FieldValue::text(item.description.clone())),
    DetailRow::new(
      "Source",
      FieldValue::opt(source.map(|s| s.label().to_string())),
    ),
  ];
  if item.kind.has_url() {
    rows.push(DetailRow::new(
      "URL",
      FieldValue::opt(item.url.clone()),
    ));
  }
  rows.push(DetailRow::new("Ownership", FieldValue::text(item.ownership.clone())));
  rows.push(DetailRow::new("Summary", FieldValue::text(item.summary.clone())));
  rows.push(DetailRow::new(
    "File",
    file_value(hostname, item.file_path.as_deref()),
  ));

  DetailTable { rows, source_url: source.map(|s| s.url.clone()) }
}

async fn form_fields<S>(
  state: &AppState<S>,
  kind: ForesightKind,
  country: &str,
  form: &ForesightForm,
) -> Result<Vec<FormField>, Error>
where
  S: FlisStore + Clone + 'static,
{
  let countries = state.store.list_countries().await.map_err(Error::store)?;
  let steep = state
    .store
    .list_categories(CategoryKind::Steep, country)
    .await
    .map_err(Error::store)?;
  let sources = all_sources(state, country).await?;

  let mut fields = vec![
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
      name:   "steep_category",
      label:  "Steep Category",
      widget: Widget::select(
        steep.iter().map(|c| (c.id.to_string(), c.label())).collect(),
        form.steep_category.clone(),
      ),
    },
    FormField {
      name:   "description",
      label:  "Description",
      widget: Widget::text(form.description.clone()),
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
  ];
  if kind.has_url() {
    fields.push(FormField {
      name:   "url",
      label:  "URL",
      widget: Widget::text(form.url.clone()),
    });
  }
  fields.push(FormField {
    name:   "ownership",
    label:  "Ownership",
    widget: Widget::text(form.ownership.clone()),
  });
  fields.push(FormField {
    name:   "summary",
    label:  "Summary",
    widget: Widget::textarea(form.summary.clone()),
  });
  fields.push(FormField {
    name:   "file_path",
    label:  "File",
    widget: Widget::text(form.file_path.clone()),
  });

  Ok(fields)
}

async fn check_references<S>(
  state: &AppState<S>,
  country: &str,
  fields: &NewForesightItem,
  errors: &mut FormErrors,
) -> Result<(), Error>
where
  S: FlisStore + Clone + 'static,
{
  if let Some(id) = fields.steep_category_id
    && state
      .store
      .get_category(CategoryKind::Steep, country, id)
      .await
      .map_err(Error::store)?
      .is_none()
  {
    errors.add("steep_category", INVALID_CHOICE);
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
  Extension(kind): Extension<ForesightKind>,
  CurrentCountry(country): CurrentCountry,
  _auth: Authenticated,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let form = ForesightForm::default();
  let fields = form_fields(&state, kind, &country.iso, &form).await?;
  Ok(form_page(
    &nav(&country.iso),
    &format!("New {}", kind.verbose_name()),
    &urls::new_url(&country.iso, kind.slug()),
    &fields,
    &FormErrors::default(),
    &urls::section_url(&country.iso, kind.slug()),
  ))
}

async fn create<S>(
  State(state): State<AppState<S>>,
  Extension(kind): Extension<ForesightKind>,
  CurrentCountry(country): CurrentCountry,
  _auth: Authenticated,
  Form(form): Form<ForesightForm>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let errors = match form.validate(kind) {
    Ok(fields) => {
      let mut errors = FormErrors::default();
      check_references(&state, &country.iso, &fields, &mut errors).await?;
      if errors.is_empty() {
        let item = state
          .store
          .add_foresight(kind, fields)
          .await
          .map_err(Error::store)?;
        return Ok(
          Redirect::to(&urls::detail_url(&country.iso, kind.slug(), item.id))
            .into_response(),
        );
      }
      errors
    }
    Err(errors) => errors,
  };

  let fields = form_fields(&state, kind, &country.iso, &form).await?;
  Ok(form_page(
    &nav(&country.iso),
    &format!("New {}", kind.verbose_name()),
    &urls::new_url(&country.iso, kind.slug()),
    &fields,
    &errors,
    &urls::section_url(&country.iso, kind.slug()),
  ))
}

async fn edit_form<S>(
  State(state): State<AppState<S>>,
  Extension(kind): Extension<ForesightKind>,
  CurrentCountry(country): CurrentCountry,
  Path(IdPath { id }): Path<IdPath>,
  _auth: Authenticated,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let item = state
    .store
    .get_foresight(kind, &country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  let form = ForesightForm::from(&item);
  let fields = form_fields(&state, kind, &country.iso, &form).await?;
  Ok(form_page(
    &nav(&country.iso),
    &format!("Edit {}: {}", kind.verbose_name(), item.label()),
    &urls::edit_url(&country.iso, kind.slug(), id),
    &fields,
    &FormErrors::default(),
    &urls::detail_url(&country.iso, kind.slug(), id),
  ))
}

async fn update<S>(
  State(state): State<AppState<S>>,
  Extension(kind): Extension<ForesightKind>,
  CurrentCountry(country): CurrentCountry,
  Path(IdPath { id }): Path<IdPath>,
  _auth: Authenticated,
  Form(form): Form<ForesightForm>,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  state
    .store
    .get_foresight(kind, &country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  let errors = match form.validate(kind) {
    Ok(fields) => {
      let mut errors = FormErrors::default();
      check_references(&state, &country.iso, &fields, &mut errors).await?;
      if errors.is_empty() {
        let updated = state
          .store
          .update_foresight(kind, &country.iso, id, fields)
          .await
          .map_err(Error::store)?;
        if !updated {
          return Err(Error::NotFound);
        }
        return Ok(
          Redirect::to(&urls::detail_url(&country.iso, kind.slug(), id))
            .into_response(),
        );
      }
      errors
    }
    Err(errors) => errors,
  };

  let fields = form_fields(&state, kind, &country.iso, &form).await?;
  Ok(form_page(
    &nav(&country.iso),
    &format!("Edit {}", kind.verbose_name()),
    &urls::edit_url(&country.iso, kind.slug(), id),
    &fields,
    &errors,
    &urls::detail_url(&country.iso, kind.slug(), id),
  ))
}

async fn delete_confirm<S>(
  State(state): State<AppState<S>>,
  Extension(kind): Extension<ForesightKind>,
  CurrentCountry(country): CurrentCountry,
  Path(IdPath { id }): Path<IdPath>,
  _auth: Authenticated,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let item = state
    .store
    .get_foresight(kind, &country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  Ok(confirm_page(
    &nav(&country.iso),
    &format!("Delete {}", kind.verbose_name()),
    item.label(),
    &urls::delete_url(&country.iso, kind.slug(), id),
    &urls::detail_url(&country.iso, kind.slug(), id),
  ))
}

async fn delete<S>(
  State(state): State<AppState<S>>,
  Extension(kind): Extension<ForesightKind>,
  CurrentCountry(country): CurrentCountry,
  Path(IdPath { id }): Path<IdPath>,
  _auth: Authenticated,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + 'static,
{
  let item = state
    .store
    .get_foresight(kind, &country.iso, id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::NotFound)?;

  match state
    .store
    .delete_foresight(kind, &country.iso, id)
    .await
    .map_err(Error::store)?
  {
    DeleteOutcome::Deleted => Ok(
      Redirect::to(&urls::section_url(&country.iso, kind.slug())).into_response(),
    ),
    DeleteOutcome::NotFound => Err(Error::NotFound),
    DeleteOutcome::Protected => Err(Error::Protected(format!(
      "{} \"{}\"",
      kind.verbose_name(),
      item.label()
    ))),
  }
}
