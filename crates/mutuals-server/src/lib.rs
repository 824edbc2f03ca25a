//! HTTP server assembly for Mutuals.
//!
//! Holds the deserialised [`ServerConfig`] and wraps the JSON API in the
//! top-level router that the binary serves.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use mutuals_core::{graph::GraphPolicy, store::RelationshipStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Which [`RelationshipStore`] implementation backs the server.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  #[default]
  Sqlite,
  Memory,
}

/// Runtime server configuration, deserialised from `config.toml` and the
/// `MUTUALS_*` environment.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub backend:          Backend,
  pub store_path:       PathBuf,
  pub allow_self_edges: bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "127.0.0.1".into(),
      port:             8080,
      backend:          Backend::default(),
      store_path:       PathBuf::from("mutuals.db"),
      allow_self_edges: true,
    }
  }
}

impl ServerConfig {
  pub fn policy(&self) -> GraphPolicy {
    GraphPolicy { allow_self_edges: self.allow_self_edges }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
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
pub fn app<S>(store: Arc<S>) -> Router
where
  S: RelationshipStore + 'static,
{
  Router::new()
    .nest("/api", mutuals_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}
