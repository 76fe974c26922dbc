//! HTTP server wiring for Deskbook: configuration and the top-level router.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use deskbook_core::{
  Engine,
  store::{ReservationStore, SpaceCatalog},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Server settings, read from a TOML file and `DESKBOOK_*` environment
/// variables (the latter win).
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// SQLite database file. A leading `~/` is expanded.
  pub store_path: PathBuf,
}

/// Load [`ServerConfig`] from `path` (optional) and the environment.
pub fn load_config(path: &Path) -> Result<ServerConfig, config::ConfigError> {
  config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 8080_i64)?
    .set_default("store_path", "deskbook.db")?
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("DESKBOOK"))
    .build()?
    .try_deserialize()
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: the JSON API under `/api`, with request tracing.
pub fn router<C, R>(engine: Arc<Engine<C, R>>) -> Router
where
  C: SpaceCatalog + 'static,
  R: ReservationStore + 'static,
{
  Router::new()
    .nest("/api", deskbook_api::api_router(engine))
    .layer(TraceLayer::new_for_http())
}
