//! Error types for `headline-core`.

use thiserror::Error;

use crate::tag::TagName;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid vote direction: {0:?}")]
  InvalidDirection(String),

  #[error("no stories match tag {0}")]
  NoMatch(TagName),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
