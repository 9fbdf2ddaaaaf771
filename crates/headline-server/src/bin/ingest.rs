//! Headline ingest job.
//!
//! Scrapes the configured homepage once and stores any new stories and tags.
//! Safe to re-run: stories already stored (by URL) are left untouched.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use headline_core::{store::NewsStore, story::NewStory};
use headline_scraper::Scraper;
use headline_server::{ServerConfig, init_tracing};
use headline_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "Scrape the news homepage into the Headline store")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the scraped `(tag, title, url)` rows and exit without writing.
  #[arg(long)]
  dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  init_tracing();
  let cli = Cli::parse();

  let cfg = ServerConfig::load(&cli.config).context("failed to load configuration")?;

  let scraper = Scraper::new(&cfg.scrape_url, cfg.scrape_limit)
    .context("failed to build scraper")?;
  let scraped = scraper
    .scrape()
    .await
    .with_context(|| format!("failed to scrape {}", scraper.base_url()))?;

  if cli.dry_run {
    for story in &scraped {
      println!("{}\t{}\t{}", story.tag, story.title, story.url);
    }
    return Ok(());
  }

  let batch: Vec<NewStory> = scraped
    .into_iter()
    .filter_map(|story| {
      let url = story.url.clone();
      let new = story.into_new_story();
      if new.is_none() {
        tracing::warn!(%url, "skipping story without a usable tag");
      }
      new
    })
    .collect();

  // Ingestion is a single batch writer; one connection is enough.
  let store_path = cfg.store_path();
  let store = SqliteStore::open(&store_path, 1)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let report = store.ingest(batch).await.context("failed to ingest stories")?;
  tracing::info!(
    stories_inserted = report.stories_inserted,
    stories_existing = report.stories_existing,
    tags_inserted = report.tags_inserted,
    links_inserted = report.links_inserted,
    "ingest complete"
  );

  Ok(())
}
