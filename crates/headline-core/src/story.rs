//! Stories — scraped news items and their ranked read model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tag::TagName;

/// A persisted news item. Stories are written only by ingestion and are never
/// mutated or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
  pub id:         i64,
  pub title:      String,
  pub url:        String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A story bundled with its score, computed at query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedStory {
  #[serde(flatten)]
  pub story: Story,
  /// Up votes minus down votes; 0 for a story nobody has voted on.
  pub score: i64,
}

// ─── Ingestion ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::NewsStore::ingest`]: one scraped headline and the
/// tag it was published under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStory {
  pub title: String,
  pub url:   String,
  pub tag:   TagName,
}

impl NewStory {
  /// Build from a scraped `(title, url, tag)` triple. Returns `None` when the
  /// raw tag has no canonical form.
  pub fn from_scraped(
    title: impl Into<String>,
    url: impl Into<String>,
    raw_tag: &str,
  ) -> Option<Self> {
    Some(Self {
      title: title.into(),
      url:   url.into(),
      tag:   TagName::canonical(raw_tag)?,
    })
  }
}

/// Summary of one ingestion batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
  /// Stories whose URL was not yet stored.
  pub stories_inserted: usize,
  /// Stories skipped because their URL was already stored.
  pub stories_existing: usize,
  pub tags_inserted:    usize,
  /// New story ↔ tag associations.
  pub links_inserted:   usize,
}
