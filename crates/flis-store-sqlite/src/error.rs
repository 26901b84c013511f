//! Error type for `flis-store-sqlite`.
//!
//! Row-not-found and protected-delete conditions are reported through the
//! `FlisStore` method signatures (`Option`, `bool`, `DeleteOutcome`), so
//! this enum only covers genuine backend failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
