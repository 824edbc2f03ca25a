//! mutuals-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), layers
//! `MUTUALS_*` environment variables on top, opens the configured store and
//! serves the JSON API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use mutuals_core::{memory::MemoryStore, store::RelationshipStore};
use mutuals_server::{Backend, ServerConfig, expand_tilde};
use mutuals_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Mutuals relationship server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("MUTUALS").try_parsing(true))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  match server_cfg.backend {
    Backend::Memory => {
      tracing::info!("using in-memory store");
      let store = MemoryStore::new(server_cfg.policy());
      serve(store, &server_cfg).await
    }
    Backend::Sqlite => {
      let store_path = expand_tilde(&server_cfg.store_path);
      tracing::info!(path = %store_path.display(), "using sqlite store");
      let store = SqliteStore::open(&store_path)
        .await
        .with_context(|| format!("failed to open store at {store_path:?}"))?
        .with_policy(server_cfg.policy());
      serve(store, &server_cfg).await
    }
  }
}

async fn serve<S>(store: S, server_cfg: &ServerConfig) -> anyhow::Result<()>
where
  S: RelationshipStore + 'static,
{
  let app = mutuals_server::app(Arc::new(store));
  let address = server_cfg.address();

  tracing::info!(
    allow_self_edges = server_cfg.allow_self_edges,
    "Listening on http://{address}"
  );
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
