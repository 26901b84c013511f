//! Route handlers: one module per entity section plus shared helpers.

pub mod categories;
pub mod countries;
pub mod foresight;
pub mod home;
pub mod indicators;
pub mod interlinks;
pub mod scenarios;
pub mod sources;
pub mod timelines;
pub mod trends;

use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;

use flis_core::{
  category::CategoryKind,
  country::Country,
  display::FieldValue,
  foresight::ForesightKind,
  store::ListQuery,
};

use crate::{
  error::Error,
  forms::FormErrors,
  html::{FormField, PageBuilder},
  urls,
};

/// Rows per page on the paginated list screens.
pub const PER_PAGE: usize = 25;

#[derive(Debug, Deserialize)]
pub struct PageParams {
  pub page: Option<usize>,
}

pub struct Pagination {
  pub page:      usize,
  pub num_pages: usize,
}

/// 1-based pagination; an out-of-range page is a not-found response.
pub fn paginate(
  total: usize,
  page: Option<usize>,
) -> Result<(ListQuery, Pagination), Error> {
  let page = page.unwrap_or(1);
  let num_pages = total.div_ceil(PER_PAGE).max(1);
  if page < 1 || page > num_pages {
    return Err(Error::NotFound);
  }
  Ok((
    ListQuery::window(PER_PAGE, (page - 1) * PER_PAGE),
    Pagination { page, num_pages },
  ))
}

/// The section navigation shown on every tenant page.
pub fn nav(country: &str) -> Vec<(String, String)> {
  let mut links = vec![
    (urls::section_url(country, sources::SLUG), "Sources".to_string()),
    (urls::section_url(country, trends::SLUG), "Trends".to_string()),
    (urls::section_url(country, indicators::SLUG), "Indicators".to_string()),
    (urls::section_url(country, interlinks::SLUG), "Interlinks".to_string()),
    (urls::section_url(country, timelines::SLUG), "Timelines".to_string()),
    (urls::section_url(country, scenarios::SLUG), "Scenarios".to_string()),
  ];
  for kind in ForesightKind::ALL {
    links.push((
      urls::section_url(country, kind.slug()),
      kind.verbose_name_plural().to_string(),
    ));
  }
  for kind in CategoryKind::ALL {
    links.push((
      urls::section_url(country, kind.slug()),
      kind.verbose_name_plural().to_string(),
    ));
  }
  links
}

/// Render a list screen: nav, "new" link, row table, pagination.
pub fn list_page(
  nav_links: &[(String, String)],
  title: &str,
  new_url: &str,
  new_label: &str,
  headers: &[&str],
  rows: &[Vec<FieldValue>],
  pagination: Option<(&str, &Pagination)>,
) -> Response {
  let mut page = PageBuilder::new(title);
  page.nav(nav_links);
  page.action_link(new_url, new_label);
  page.list_table(headers, rows);
  if let Some((base_url, p)) = pagination {
    page.pagination(base_url, p.page, p.num_pages);
  }
  Html(page.finish()).into_response()
}

/// Render a create/edit form page.
pub fn form_page(
  nav_links: &[(String, String)],
  title: &str,
  action: &str,
  fields: &[FormField],
  errors: &FormErrors,
  cancel_url: &str,
) -> Response {
  let mut page = PageBuilder::new(title);
  page.nav(nav_links);
  page.form(action, fields, errors, "Save", cancel_url);
  Html(page.finish()).into_response()
}

/// Render a delete confirmation page.
pub fn confirm_page(
  nav_links: &[(String, String)],
  title: &str,
  label: &str,
  action: &str,
  cancel_url: &str,
) -> Response {
  let mut page = PageBuilder::new(title);
  page.nav(nav_links);
  page.paragraph(&format!("Are you sure you want to delete \"{label}\"?"));
  page.form(action, &[], &FormErrors::default(), "Delete", cancel_url);
  Html(page.finish()).into_response()
}

/// Options for the country select carried by every tenant form.
pub fn country_options(countries: &[Country]) -> Vec<(String, String)> {
  countries.iter().map(|c| (c.iso.clone(), c.iso.clone())).collect()
}

/// An attachment cell: a link against the configured public hostname, or
/// the literal `None`. Stored paths are server-relative.
pub fn file_value(hostname: &str, path: Option<&str>) -> FieldValue {
  match path {
    Some(p) => FieldValue::link(format!("{hostname}{p}"), basename(p)),
    None => FieldValue::Missing,
  }
}

fn basename(path: &str) -> &str {
  path.rsplit('/').next().unwrap_or(path)
}

/// Path segment for detail/edit/delete routes. The country segment is
/// consumed by the tenancy middleware; only `id` matters here.
#[derive(Debug, Deserialize)]
pub struct IdPath {
  pub id: i64,
}

/// All rows of a reference section, for building form selects. The default
/// query window is unbounded.
pub const ALL: ListQuery = ListQuery { limit: None, offset: 0 };
