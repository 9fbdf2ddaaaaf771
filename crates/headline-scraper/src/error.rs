//! Error type for `headline-scraper`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("invalid base url: {0}")]
  Url(#[from] url::ParseError),

  #[error("invalid css selector {selector:?}: {reason}")]
  Selector {
    selector: &'static str,
    reason:   String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
