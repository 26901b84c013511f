//! HTTP layer for the FLIS catalogue.
//!
//! Exposes an axum [`Router`] of server-rendered HTML screens backed by any
//! [`FlisStore`]. Every tenant screen lives under a `/{country}` prefix
//! resolved by the tenancy middleware; country management lives under
//! `/management`, outside tenant scope.

pub mod auth;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod html;
pub mod tenancy;
pub mod urls;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware, routing::get};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use flis_core::{
  category::CategoryKind, foresight::ForesightKind, store::FlisStore,
};

use auth::AuthConfig;
use handlers::{
  categories, countries, foresight, home, indicators, interlinks, scenarios,
  sources, timelines, trends,
};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "defaults::host")]
  pub host:       String,
  #[serde(default = "defaults::port")]
  pub port:       u16,
  /// Public base URL prefixed to attachment links on detail screens.
  #[serde(default = "defaults::hostname")]
  pub hostname:   String,
  #[serde(default = "defaults::store_path")]
  pub store_path: PathBuf,
  /// Basic-auth credentials for the mutating screens. Left unset, the
  /// screens are open. Set both or neither.
  #[serde(default)]
  pub auth_username:      Option<String>,
  /// PHC string produced by argon2; see `--hash-password`.
  #[serde(default)]
  pub auth_password_hash: Option<String>,
}

mod defaults {
  use std::path::PathBuf;

  pub fn host() -> String { "127.0.0.1".into() }
  pub fn port() -> u16 { 8000 }
  pub fn hostname() -> String { "http://localhost:8000".into() }
  pub fn store_path() -> PathBuf { "flis.db".into() }
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: FlisStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub auth:   Option<Arc<AuthConfig>>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full application router.
///
/// The `/{country}` subtree is wrapped in [`tenancy::country_scope`], so
/// every handler inside it sees a resolved [`Country`](flis_core::country::Country)
/// and form validation sees the matching task-local scope.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: FlisStore + Clone + 'static,
{
  let mut scoped = Router::new()
    .route("/", get(home::section_index::<S>))
    .merge(sources::routes::<S>())
    .merge(trends::routes::<S>())
    .merge(timelines::routes::<S>())
    .merge(scenarios::routes::<S>())
    .merge(indicators::routes::<S>())
    .merge(interlinks::routes::<S>());
  for kind in CategoryKind::ALL {
    scoped = scoped.merge(categories::routes::<S>(kind));
  }
  for kind in ForesightKind::ALL {
    scoped = scoped.merge(foresight::routes::<S>(kind));
  }
  let scoped = scoped.layer(middleware::from_fn_with_state(
    state.clone(),
    tenancy::country_scope::<S>,
  ));

  Router::new()
    .route("/", get(home::country_picker::<S>))
    .nest("/management/countries", countries::routes::<S>())
    .nest("/{country}", scoped)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[cfg(test)]
mod tests;
