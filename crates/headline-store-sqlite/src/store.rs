//! [`SqliteStore`] — the SQLite implementation of [`NewsStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, TransactionBehavior};

use headline_core::{
  search::TagHits,
  store::NewsStore,
  story::{IngestReport, NewStory, RankedStory},
  tag::TagName,
  vote::{Direction, Vote},
};

use crate::{
  Result,
  encode::{RawRankedStory, RawTagMatch, RawVote, encode_dt},
  pool::Pool,
};

// ─── SQL ─────────────────────────────────────────────────────────────────────

/// Score is the signed sum of vote directions. The LEFT JOIN keeps stories
/// nobody has voted on; their single all-NULL vote row scores 0.
const LIST_STORIES: &str = "
SELECT s.id, s.title, s.url, s.created_at, s.updated_at,
       COALESCE(SUM(CASE v.direction WHEN 'up' THEN 1 WHEN 'down' THEN -1 ELSE 0 END), 0)
         AS score
FROM stories s
LEFT JOIN votes v ON v.story_id = s.id
GROUP BY s.id
ORDER BY score DESC, s.id ASC";

const STORIES_FOR_TAG: &str = "
SELECT s.title, s.url
FROM stories s
JOIN metadata m ON m.story_id = s.id
JOIN tags     t ON t.id       = m.tag_id
WHERE t.description = ?1
ORDER BY s.id ASC";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Headline store backed by a single SQLite file.
///
/// Cloning is cheap — clones share the same connection pool.
#[derive(Clone)]
pub struct SqliteStore {
  pool: Pool,
}

impl SqliteStore {
  /// Open (or create) a store at `path` with `pool_size` connections.
  pub async fn open(path: impl AsRef<Path>, pool_size: usize) -> Result<Self> {
    Ok(Self { pool: Pool::open(path, pool_size).await? })
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    Ok(Self { pool: Pool::open_in_memory().await? })
  }

  pub fn pool(&self) -> &Pool { &self.pool }
}

// ─── NewsStore impl ──────────────────────────────────────────────────────────

impl NewsStore for SqliteStore {
  type Error = crate::Error;

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_stories(&self) -> Result<Vec<RankedStory>> {
    let conn = self.pool.acquire().await?;

    let raws: Vec<RawRankedStory> = conn
      .call(|conn| {
        let mut stmt = conn.prepare(LIST_STORIES)?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawRankedStory {
              id:         row.get(0)?,
              title:      row.get(1)?,
              url:        row.get(2)?,
              created_at: row.get(3)?,
              updated_at: row.get(4)?,
              score:      row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRankedStory::into_ranked).collect()
  }

  async fn search_by_tags(&self, tags: &[TagName]) -> Result<Vec<TagHits>> {
    let names: Vec<String> =
      tags.iter().map(|t| t.as_str().to_owned()).collect();
    let conn = self.pool.acquire().await?;

    let per_tag: Vec<Vec<RawTagMatch>> = conn
      .call(move |conn| {
        let mut stmt = conn.prepare(STORIES_FOR_TAG)?;
        let mut out = Vec::with_capacity(names.len());
        for name in &names {
          let rows = stmt
            .query_map(rusqlite::params![name], |row| {
              Ok(RawTagMatch { title: row.get(0)?, url: row.get(1)? })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          out.push(rows);
        }
        Ok(out)
      })
      .await?;

    Ok(
      tags
        .iter()
        .zip(per_tag)
        .map(|(tag, rows)| TagHits {
          tag:     tag.clone(),
          matches: rows.into_iter().map(|r| r.into_match(tag)).collect(),
        })
        .collect(),
    )
  }

  async fn count_votes(&self) -> Result<u64> {
    let conn = self.pool.acquire().await?;
    let n: i64 = conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM votes", [], |r| r.get(0))?)
      })
      .await?;
    Ok(n as u64)
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn record_vote(
    &self,
    story_id:  i64,
    direction: Direction,
  ) -> Result<Option<Vote>> {
    let at_str  = encode_dt(Utc::now());
    let conn    = self.pool.acquire().await?;

    let raw: Option<RawVote> = conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let exists = tx
          .query_row(
            "SELECT 1 FROM stories WHERE id = ?1",
            rusqlite::params![story_id],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !exists {
          // Dropping `tx` rolls back; nothing was written anyway.
          return Ok(None);
        }

        let vote = tx.query_row(
          "INSERT INTO votes (direction, story_id, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?3)
           RETURNING id, direction, story_id, created_at, updated_at",
          rusqlite::params![direction.as_ref(), story_id, at_str],
          |row| {
            Ok(RawVote {
              id:         row.get(0)?,
              direction:  row.get(1)?,
              story_id:   row.get(2)?,
              created_at: row.get(3)?,
              updated_at: row.get(4)?,
            })
          },
        )?;
        tx.commit()?;
        Ok(Some(vote))
      })
      .await?;

    let vote = raw.map(RawVote::into_vote).transpose()?;
    match &vote {
      Some(v) => tracing::debug!(vote_id = v.id, story_id, %direction, "recorded vote"),
      None => tracing::debug!(story_id, "vote for unknown story ignored"),
    }
    Ok(vote)
  }

  async fn ingest(&self, stories: Vec<NewStory>) -> Result<IngestReport> {
    let at_str = encode_dt(Utc::now());
    let conn   = self.pool.acquire().await?;

    let report = conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut report = IngestReport::default();
        {
          // Every insert is `ON CONFLICT DO NOTHING` against a uniqueness
          // constraint, never read-then-write, so concurrent batches can't
          // create duplicates.
          let mut insert_story = tx.prepare(
            "INSERT INTO stories (title, url, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT (url) DO NOTHING",
          )?;
          let mut story_id = tx.prepare("SELECT id FROM stories WHERE url = ?1")?;
          let mut insert_tag = tx.prepare(
            "INSERT INTO tags (description) VALUES (?1)
             ON CONFLICT (description) DO NOTHING",
          )?;
          let mut tag_id = tx.prepare("SELECT id FROM tags WHERE description = ?1")?;
          let mut link = tx.prepare(
            "INSERT INTO metadata (story_id, tag_id) VALUES (?1, ?2)
             ON CONFLICT DO NOTHING",
          )?;

          for story in &stories {
            if insert_story.execute(rusqlite::params![story.title, story.url, at_str])? == 1 {
              report.stories_inserted += 1;
            } else {
              report.stories_existing += 1;
            }
            let sid: i64 =
              story_id.query_row(rusqlite::params![story.url], |r| r.get(0))?;

            let tag = story.tag.as_str();
            report.tags_inserted += insert_tag.execute(rusqlite::params![tag])?;
            let tid: i64 = tag_id.query_row(rusqlite::params![tag], |r| r.get(0))?;

            report.links_inserted += link.execute(rusqlite::params![sid, tid])?;
          }
        }
        tx.commit()?;
        Ok(report)
      })
      .await?;

    tracing::debug!(?report, "ingested batch");
    Ok(report)
  }
}
