//! HTTP server assembly for the student information service.
//!
//! Combines the JSON API with the browser UI's static assets, and loads the
//! server configuration.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use serde::Deserialize;
use sims_api::StudentService;
use sims_core::store::StudentStore;
use tower_http::{
  cors::CorsLayer,
  services::{ServeDir, ServeFile},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// The backing JSON document.
  pub data_path:  PathBuf,
  /// Directory holding `index.html` and the UI's assets.
  pub static_dir: PathBuf,
}

/// Load configuration from built-in defaults, then the optional TOML file at
/// `path`, then `SIMS_*` environment variables, then `port_override` (the
/// conventional bare `PORT` variable).
pub fn load_config(
  path: &Path,
  port_override: Option<String>,
) -> Result<ServerConfig, config::ConfigError> {
  config::Config::builder()
    .set_default("host", "0.0.0.0")?
    .set_default("port", 3000)?
    .set_default("data_path", "students.json")?
    .set_default("static_dir", "public")?
    .add_source(config::File::from(path.to_path_buf()).required(false))
    .add_source(config::Environment::with_prefix("SIMS"))
    .set_override_option("port", port_override)?
    .build()?
    .try_deserialize()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
///
/// API routes are matched first. Any other path is looked up in
/// `static_dir`, falling back to its `index.html` so the UI's entry page is
/// served for unknown paths.
pub fn app<S>(service: Arc<StudentService<S>>, static_dir: &Path) -> Router
where
  S: StudentStore + 'static,
{
  let assets = ServeDir::new(static_dir)
    .fallback(ServeFile::new(static_dir.join("index.html")));

  sims_api::api_router(service)
    .fallback_service(assets)
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
}
