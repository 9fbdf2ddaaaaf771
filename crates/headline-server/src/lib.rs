//! Process-level wiring for Headline: configuration, tracing, and the full
//! HTTP application (JSON API plus the static homepage).
//!
//! Shared by the `server` and `ingest` binaries.

use std::path::{Path, PathBuf};

use axum::Router;
use headline_api::{ApiState, api_router};
use headline_core::{search::SearchPolicy, store::NewsStore};
use serde::Deserialize;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration, deserialised once at startup from `config.toml` and
/// `HEADLINE_*` environment variables, then passed to whatever needs it.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:          String,
  #[serde(default = "default_port")]
  pub port:          u16,
  /// SQLite database file; a leading `~/` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path:    PathBuf,
  #[serde(default = "default_pool_size")]
  pub pool_size:     usize,
  /// Directory served at `/`; must contain `index.html`.
  #[serde(default = "default_static_dir")]
  pub static_dir:    PathBuf,
  #[serde(default)]
  pub search_policy: SearchPolicy,
  /// Homepage read by the ingest job.
  #[serde(default = "default_scrape_url")]
  pub scrape_url:    String,
  /// Maximum story blocks considered per scrape.
  #[serde(default = "default_scrape_limit")]
  pub scrape_limit:  usize,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }
fn default_store_path() -> PathBuf { PathBuf::from("headline.db") }
fn default_pool_size() -> usize { 4 }
fn default_static_dir() -> PathBuf { PathBuf::from("static") }
fn default_scrape_url() -> String { "http://bbc.co.uk".to_string() }
fn default_scrape_limit() -> usize { 10 }

impl ServerConfig {
  /// Read `path` (optional) overlaid with `HEADLINE_*` environment variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("HEADLINE"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// `store_path` with `~` expanded.
  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Tracing ─────────────────────────────────────────────────────────────────

/// Install the global `fmt` subscriber; `RUST_LOG` overrides the INFO default.
pub fn init_tracing() {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();
}

// ─── Application ──────────────────────────────────────────────────────────────

/// The complete HTTP application: API routes, with every other path served
/// from `config.static_dir`, all wrapped in request tracing.
pub fn app<S>(store: std::sync::Arc<S>, config: &ServerConfig) -> Router
where
  S: NewsStore + Clone + 'static,
{
  let state = ApiState::new(store).with_search_policy(config.search_policy);

  api_router(state)
    .fallback_service(ServeDir::new(&config.static_dir))
    .layer(TraceLayer::new_for_http())
}
