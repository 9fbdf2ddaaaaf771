//! Votes — anonymous, append-only up/down signals cast against a story.
//!
//! Votes are never updated or deleted and are not de-duplicated by voter. A
//! story's score is derived from them at read time.

use std::str::FromStr as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{Error, Result};

/// The direction of a single vote.
///
/// Parsing is exact and case-sensitive: only `"up"` and `"down"` are
/// accepted.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
  Up,
  Down,
}

impl Direction {
  pub fn parse(raw: &str) -> Result<Self> {
    Self::from_str(raw).map_err(|_| Error::InvalidDirection(raw.to_owned()))
  }

  /// Contribution of one vote in this direction to a story's score.
  pub fn weight(self) -> i64 {
    match self {
      Self::Up => 1,
      Self::Down => -1,
    }
  }
}

/// A recorded vote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
  pub id:         i64,
  pub direction:  Direction,
  pub story_id:   i64,
  /// Server-assigned at insert time.
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Net score for a set of votes: ups minus downs. An empty set scores 0.
pub fn score<I>(directions: I) -> i64
where
  I: IntoIterator<Item = Direction>,
{
  directions.into_iter().map(Direction::weight).sum()
}
