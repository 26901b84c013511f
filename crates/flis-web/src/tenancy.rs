//! Request-scoped country context — the tenancy enforcement core.
//!
//! The country is resolved once per request from the leading path segment
//! and propagated two ways: into the request extensions, where handlers
//! read it through [`CurrentCountry`], and into a task-local, where form
//! validation reads it through [`current_country`]. The task-local exists
//! because validation runs deep inside the form types with no handle on
//! the request; it is the async equivalent of recovering the request from
//! a thread-local.
//!
//! An unknown country is a not-found response before any handler runs.
//! Management routes live outside the scoped subtree and see no country.

use axum::{
  extract::{FromRequestParts, Path, Request, State},
  http::request::Parts,
  middleware::Next,
  response::Response,
};
use serde::Deserialize;

use flis_core::{country::Country, store::FlisStore};

use crate::{AppState, error::Error};

tokio::task_local! {
  /// The country the current request was dispatched for.
  static CURRENT_COUNTRY: Country;
}

/// Read the current request's country scope.
///
/// `None` outside a scoped request: on management screens, in background
/// tasks, and in tests that bypass the middleware.
pub fn current_country() -> Option<Country> {
  CURRENT_COUNTRY.try_with(Clone::clone).ok()
}

/// Run `fut` inside an explicit country scope.
///
/// Used by tests and by any caller that needs form validation without
/// going through [`country_scope`].
pub async fn with_country<F>(country: Country, fut: F) -> F::Output
where
  F: Future,
{
  CURRENT_COUNTRY.scope(country, fut).await
}

#[derive(Deserialize)]
struct CountrySegment {
  country: String,
}

/// Middleware for the `/{country}` subtree: resolve the segment against the
/// store, or answer not-found.
pub async fn country_scope<S>(
  State(state): State<AppState<S>>,
  Path(segment): Path<CountrySegment>,
  mut req: Request,
  next: Next,
) -> Result<Response, Error>
where
  S: FlisStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let country = state
    .store
    .get_country(&segment.country)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::CountryNotFound(segment.country.clone()))?;

  req.extensions_mut().insert(country.clone());
  Ok(CURRENT_COUNTRY.scope(country, next.run(req)).await)
}

/// Extractor for the resolved country; present on every `/{country}` route.
pub struct CurrentCountry(pub Country);

impl<St> FromRequestParts<St> for CurrentCountry
where
  St: Send + Sync,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &St,
  ) -> Result<Self, Self::Rejection> {
    parts
      .extensions
      .get::<Country>()
      .cloned()
      .map(CurrentCountry)
      .ok_or(Error::NotFound)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn romania() -> Country {
    Country { iso: "ro".into(), name: "Romania".into() }
  }

  #[tokio::test]
  async fn current_country_is_none_outside_a_scope() {
    assert!(current_country().is_none());
  }

  #[tokio::test]
  async fn with_country_scopes_the_future() {
    let seen = with_country(romania(), async { current_country() }).await;
    assert_eq!(seen.map(|c| c.iso), Some("ro".to_string()));

    // The scope ends with the future.
    assert!(current_country().is_none());
  }

  #[tokio::test]
  async fn scopes_nest_innermost_wins() {
    let slovenia = Country { iso: "si".into(), name: "Slovenia".into() };
    let seen = with_country(romania(), async {
      with_country(slovenia, async { current_country() }).await
    })
    .await;
    assert_eq!(seen.map(|c| c.iso), Some("si".to_string()));
  }
}
