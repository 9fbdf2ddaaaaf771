//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Directions are stored as
//! their lowercase wire form; tag descriptions in canonical form.

use chrono::{DateTime, Utc};
use headline_core::{
  search::TagMatch,
  story::{RankedStory, Story},
  tag::TagName,
  vote::{Direction, Vote},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Direction ───────────────────────────────────────────────────────────────

pub fn decode_direction(s: &str) -> Result<Direction> {
  Ok(Direction::parse(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read from a `stories` row joined with its aggregated votes.
pub struct RawRankedStory {
  pub id:         i64,
  pub title:      String,
  pub url:        String,
  pub created_at: String,
  pub updated_at: String,
  pub score:      i64,
}

impl RawRankedStory {
  pub fn into_ranked(self) -> Result<RankedStory> {
    Ok(RankedStory {
      story: Story {
        id:         self.id,
        title:      self.title,
        url:        self.url,
        created_at: decode_dt(&self.created_at)?,
        updated_at: decode_dt(&self.updated_at)?,
      },
      score: self.score,
    })
  }
}

/// Raw values read from a `votes` row.
pub struct RawVote {
  pub id:         i64,
  pub direction:  String,
  pub story_id:   i64,
  pub created_at: String,
  pub updated_at: String,
}

impl RawVote {
  pub fn into_vote(self) -> Result<Vote> {
    Ok(Vote {
      id:         self.id,
      direction:  decode_direction(&self.direction)?,
      story_id:   self.story_id,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw `(title, url)` pair found under a queried tag.
pub struct RawTagMatch {
  pub title: String,
  pub url:   String,
}

impl RawTagMatch {
  pub fn into_match(self, tag: &TagName) -> TagMatch {
    TagMatch { title: self.title, url: self.url, tag: tag.clone() }
  }
}
