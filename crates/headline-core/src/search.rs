//! Tag search result assembly.
//!
//! Storage backends return one [`TagHits`] per queried tag, in query order.
//! [`collect_matches`] flattens them into the response list according to a
//! [`SearchPolicy`].

use serde::{Deserialize, Serialize};

use crate::{Error, Result, tag::TagName};

/// One story found under a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMatch {
  pub title: String,
  pub url:   String,
  pub tag:   TagName,
}

/// Every match for a single queried tag, in storage order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagHits {
  pub tag:     TagName,
  pub matches: Vec<TagMatch>,
}

/// What to do when a queried tag matches no stories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPolicy {
  /// Leave the tag out and keep going.
  #[default]
  SkipEmpty,
  /// Fail the whole search on the first tag with no matches.
  RejectEmpty,
}

/// Concatenate per-tag hits in query order. Results are not de-duplicated: a
/// story under two queried tags appears once per tag.
pub fn collect_matches(
  hits: Vec<TagHits>,
  policy: SearchPolicy,
) -> Result<Vec<TagMatch>> {
  let mut out = Vec::new();
  for TagHits { tag, matches } in hits {
    if matches.is_empty() && policy == SearchPolicy::RejectEmpty {
      return Err(Error::NoMatch(tag));
    }
    out.extend(matches);
  }
  Ok(out)
}
