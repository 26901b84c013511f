//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The `{country}` path segment did not resolve to a known tenant.
  #[error("unknown country: {0}")]
  CountryNotFound(String),
  #[error("not found")]
  NotFound,
  #[error("unauthorized")]
  Unauthorized,
  /// A delete was refused because the row is still referenced.
  #[error("{0} is still referenced and cannot be deleted")]
  Protected(String),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend failure from the generic store.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Store(Box::new(e))
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::CountryNotFound(_) | Error::NotFound => {
        (StatusCode::NOT_FOUND, "Not Found").into_response()
      }
      Error::Unauthorized => {
        let mut res =
          (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"flis\""),
        );
        res
      }
      Error::Protected(what) => (
        StatusCode::CONFLICT,
        format!("{what} is still referenced and cannot be deleted"),
      )
        .into_response(),
      Error::Store(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
      }
    }
  }
}
