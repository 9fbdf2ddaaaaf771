//! Headline HTTP server.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! connection pool, and serves the JSON API and static homepage.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use headline_server::{ServerConfig, app, init_tracing};
use headline_store_sqlite::SqliteStore;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(author, version, about = "Headline news aggregator server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  init_tracing();
  let cli = Cli::parse();

  let cfg = ServerConfig::load(&cli.config).context("failed to load configuration")?;

  let store_path = cfg.store_path();
  let store = SqliteStore::open(&store_path, cfg.pool_size)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  tracing::info!(path = ?store_path, pool_size = cfg.pool_size, "opened store");

  let app = app(Arc::new(store), &cfg);
  let address = cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
