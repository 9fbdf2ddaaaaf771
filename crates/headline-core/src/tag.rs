//! Tags — canonical category labels attached to stories.
//!
//! A tag description is always stored and compared in its canonical form:
//! the first character upper-cased and the remainder lower-cased (ASCII
//! semantics). Both ingestion and search go through [`TagName::canonical`], so
//! `"politics"`, `"Politics"` and `"pOLITICS"` all name the same tag.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─── TagName ─────────────────────────────────────────────────────────────────

/// A tag description in canonical form.
///
/// Every constructor (including deserialisation) goes through
/// [`TagName::canonical`], so a `TagName` in hand is always normalised.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagName(String);

impl TagName {
  /// Normalise raw tag text. Surrounding whitespace is dropped; returns `None`
  /// if nothing is left.
  pub fn canonical(raw: &str) -> Option<Self> {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    let first = chars.next()?;

    let mut out = String::with_capacity(trimmed.len());
    out.push(first.to_ascii_uppercase());
    out.extend(chars.map(|c| c.to_ascii_lowercase()));
    Some(Self(out))
  }

  pub fn as_str(&self) -> &str { &self.0 }

  pub fn into_inner(self) -> String { self.0 }
}

impl fmt::Display for TagName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl AsRef<str> for TagName {
  fn as_ref(&self) -> &str { &self.0 }
}

impl TryFrom<String> for TagName {
  type Error = &'static str;

  fn try_from(raw: String) -> Result<Self, Self::Error> {
    Self::canonical(&raw).ok_or("tag description must not be blank")
  }
}

impl From<TagName> for String {
  fn from(tag: TagName) -> Self { tag.0 }
}

/// Split a comma-separated tag list (the `?tags=` query form) and normalise
/// each entry, preserving order. Blank entries are dropped; duplicates are
/// kept.
pub fn parse_tag_list(raw: &str) -> Vec<TagName> {
  raw.split(',').filter_map(TagName::canonical).collect()
}
