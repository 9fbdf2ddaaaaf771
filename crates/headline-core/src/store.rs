//! The `NewsStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `headline-store-sqlite`). Higher layers (`headline-api`, the ingest binary)
//! depend on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  search::TagHits,
  story::{IngestReport, NewStory, RankedStory},
  tag::TagName,
  vote::{Direction, Vote},
};

/// Abstraction over a Headline storage backend.
///
/// Stories, tags and their associations are written only by [`ingest`];
/// votes are written only by [`record_vote`]. Nothing is ever deleted.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
///
/// [`ingest`]: NewsStore::ingest
/// [`record_vote`]: NewsStore::record_vote
pub trait NewsStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Every story with its score, ordered by score descending and then by id
  /// ascending. Stories without votes are included with a score of 0. An
  /// empty store yields an empty list, not an error.
  fn list_stories(
    &self,
  ) -> impl Future<Output = Result<Vec<RankedStory>, Self::Error>> + Send + '_;

  /// Look up the stories filed under each tag, one [`TagHits`] per input tag
  /// in input order. A tag with no stories yields an empty `matches` list.
  fn search_by_tags<'a>(
    &'a self,
    tags: &'a [TagName],
  ) -> impl Future<Output = Result<Vec<TagHits>, Self::Error>> + Send + 'a;

  /// Total number of recorded votes across all stories.
  fn count_votes(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Append one vote and return it. Timestamps are set by the store.
  ///
  /// Returns `None`, having written nothing, if `story_id` does not exist.
  fn record_vote(
    &self,
    story_id: i64,
    direction: Direction,
  ) -> impl Future<Output = Result<Option<Vote>, Self::Error>> + Send + '_;

  /// Persist a batch of scraped stories atomically.
  ///
  /// Idempotent: stories are keyed by URL, tags by description, and
  /// associations by `(story, tag)`, so re-ingesting the same batch changes
  /// nothing.
  fn ingest(
    &self,
    stories: Vec<NewStory>,
  ) -> impl Future<Output = Result<IngestReport, Self::Error>> + Send + '_;
}
